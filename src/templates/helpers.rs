//! Functions and filters available inside every template

use minijinja::{Environment, State, Value};

use super::BASE_TEMPLATE;
use crate::gateway::encode_target;

/// Register the dashboard helpers on an environment
///
/// The general-purpose `minijinja-contrib` functions and filters come along
/// too.
pub fn register(env: &mut Environment<'static>) {
    minijinja_contrib::add_to_environment(env);

    env.add_function("dyn_template", dyn_template);
    env.add_function("proxy", proxy);
    env.add_function("unesc_js", unesc_js);
    env.add_function("to_alpha_num", to_alpha_num);

    env.add_filter("proxy", proxy);
    env.add_filter("unesc_js", unesc_js);
    env.add_filter("to_alpha_num", to_alpha_num);
}

/// Render another template by name with `data` as its whole context
///
/// Lenient: an unknown template or a failing render produces an empty
/// fragment, so one broken card leaves the rest of the page intact.
pub fn dyn_template(state: &State, name: &str, data: Value) -> Value {
    if name == BASE_TEMPLATE {
        return Value::from_safe_string(String::new());
    }

    let rendered = state
        .env()
        .get_template(name)
        .and_then(|template| template.render(data));

    match rendered {
        Ok(html) => Value::from_safe_string(html),
        Err(e) => {
            tracing::debug!("Skipping template '{}': {}", name, e);
            Value::from_safe_string(String::new())
        }
    }
}

/// Path that fetches `url` through the proxy endpoint
pub fn proxy(url: &str) -> String {
    format!("/proxy/{}", encode_target(url))
}

/// Emit a string without escaping, for inline script content
///
/// Never pass attacker-controlled text through this.
pub fn unesc_js(script: String) -> Value {
    Value::from_safe_string(script)
}

/// Keep only ASCII letters and digits, for deriving element ids
pub fn to_alpha_num(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::{context, AutoEscape};

    fn env() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        register(&mut env);
        env
    }

    #[test]
    fn test_proxy_path() {
        assert_eq!(proxy("http://a/???"), "/proxy/aHR0cDovL2EvPz8/");
        assert_eq!(proxy(""), "/proxy/");
    }

    #[test]
    fn test_contrib_filters_available() {
        let mut env = env();
        env.add_template("t", "{{ n }} card{{ n|pluralize }}").unwrap();
        let render = |n: i64| env.get_template("t").unwrap().render(context! { n }).unwrap();
        assert_eq!(render(1), "1 card");
        assert_eq!(render(3), "3 cards");
    }

    #[test]
    fn test_to_alpha_num() {
        assert_eq!(to_alpha_num("My Card #1!"), "MyCard1");
        assert_eq!(to_alpha_num("ünï-côdé"), "ncd");
        assert_eq!(to_alpha_num("!!!"), "");
    }

    #[test]
    fn test_unesc_js_skips_escaping() {
        let mut env = env();
        env.add_template("t", "{{ unesc_js(code) }}|{{ code }}").unwrap();
        let out = env
            .get_template("t")
            .unwrap()
            .render(context! { code => "a < b && c" })
            .unwrap();
        assert_eq!(out, "a < b && c|a &lt; b &amp;&amp; c");
    }

    #[test]
    fn test_dyn_template_renders_with_data() {
        let mut env = env();
        env.add_template("card", "<b>{{ title }}</b>").unwrap();
        env.add_template("page", "{{ dyn_template('card', item) }}").unwrap();
        let out = env
            .get_template("page")
            .unwrap()
            .render(context! { item => context! { title => "x & y" } })
            .unwrap();
        assert_eq!(out, "<b>x &amp; y</b>");
    }

    #[test]
    fn test_dyn_template_unknown_is_empty() {
        let mut env = env();
        env.add_template("page", "[{{ dyn_template('nope', 1) }}]").unwrap();
        let out = env.get_template("page").unwrap().render(()).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_dyn_template_failure_is_empty() {
        let mut env = env();
        env.add_template("broken", "{{ missing_helper() }}").unwrap();
        env.add_template("page", "[{{ dyn_template('broken', none) }}]").unwrap();
        let out = env.get_template("page").unwrap().render(()).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_dyn_template_refuses_base() {
        let mut env = env();
        env.add_template("base", "layout").unwrap();
        env.add_template("page", "[{{ dyn_template('base', none) }}]").unwrap();
        let out = env.get_template("page").unwrap().render(()).unwrap();
        assert_eq!(out, "[]");
    }
}
