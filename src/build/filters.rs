//! Template filters and shortcodes.
//!
//! The plain functions hold the behavior; the `*_filter` / `*_shortcode`
//! constructors adapt them to tera's calling convention so they can be
//! handed to the [`Registry`](crate::site::Registry).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tera::Value;

use crate::config::{ImageConfig, ReadingTimeConfig};

/// Anything that looks like a tag. Deliberately loose: attributes containing
/// `>` are cut short, which existing content already accounts for.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Estimated reading time in whole minutes, never less than one.
///
/// Markup is stripped with a regex, not parsed, and the remaining characters
/// are divided by `chars_per_minute`.
pub fn read_time(content: &str, chars_per_minute: usize) -> u64 {
    let text = TAG_PATTERN.replace_all(content, "");
    let chars = text.chars().count();
    (chars / chars_per_minute.max(1)).max(1) as u64
}

/// An `<img>` pointing into the posts image directory.
///
/// Neither argument is escaped or checked; the result is spliced into the
/// page as-is.
pub fn asset_img(filename: &str, alt: &str, config: &ImageConfig) -> String {
    format!(
        "<img class=\"{}\" src=\"{}{}\" alt=\"{}\" />",
        config.class, config.base_url, filename, alt
    )
}

/// `{{ content | readTime }}`
pub fn read_time_filter(
    config: &ReadingTimeConfig,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static {
    let chars_per_minute = config.chars_per_minute;
    move |value: &Value, _args: &HashMap<String, Value>| {
        let content = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("readTime expects a string"))?;
        Ok(Value::from(read_time(content, chars_per_minute)))
    }
}

/// `{{ asset_img(filename="cat.png", alt="a cat") }}`
pub fn asset_img_shortcode(
    config: &ImageConfig,
) -> impl Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static {
    let config = config.clone();
    move |args: &HashMap<String, Value>| {
        let filename = string_arg(args, "asset_img", "filename")?;
        let alt = string_arg(args, "asset_img", "alt")?;
        Ok(Value::String(asset_img(filename, alt, &config)))
    }
}

fn string_arg<'a>(
    args: &'a HashMap<String, Value>,
    function: &str,
    name: &str,
) -> tera::Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg(format!("{function} requires a string `{name}` argument")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_time_plain_text() {
        let content = "a".repeat(900);
        assert_eq!(read_time(&content, 450), 2);
    }

    #[test]
    fn test_read_time_floors() {
        assert_eq!(read_time(&"a".repeat(1349), 450), 2);
        assert_eq!(read_time(&"a".repeat(1350), 450), 3);
    }

    #[test]
    fn test_read_time_empty_tags_clamp_to_one() {
        assert_eq!(read_time("<p></p>", 450), 1);
        assert_eq!(read_time("", 450), 1);
    }

    #[test]
    fn test_read_time_ignores_markup() {
        let body = "b".repeat(450);
        let html = format!("<article class=\"post\"><p>{body}</p><img src=\"x.png\" /></article>");
        assert_eq!(read_time(&html, 450), 1);

        let long = format!("<p>{}</p>", "b".repeat(900));
        assert_eq!(read_time(&long, 450), 2);
    }

    #[test]
    fn test_read_time_counts_characters_not_bytes() {
        let content = "é".repeat(900);
        assert_eq!(read_time(&content, 450), 2);
    }

    #[test]
    fn test_read_time_lossy_stripping_is_preserved() {
        // `>` inside an attribute ends the match early, leaving `b">` behind
        let html = "<a title=\"a>b\">x</a>";
        let stripped = TAG_PATTERN.replace_all(html, "");
        assert_eq!(stripped, "b\">x");
    }

    #[test]
    fn test_asset_img() {
        assert_eq!(
            asset_img("cat.png", "a cat", &ImageConfig::default()),
            "<img class=\"my-4\" src=\"/assets/img/posts/cat.png\" alt=\"a cat\" />"
        );
    }

    #[test]
    fn test_asset_img_does_not_escape() {
        let html = asset_img("x.png", "say \"hi\"", &ImageConfig::default());
        assert!(html.contains("alt=\"say \"hi\"\""));
    }

    #[test]
    fn test_read_time_filter_rejects_non_strings() {
        let filter = read_time_filter(&ReadingTimeConfig::default());
        assert_eq!(
            filter(&Value::from("a".repeat(900)), &HashMap::new()).unwrap(),
            Value::from(2)
        );
        assert!(filter(&Value::from(3), &HashMap::new()).is_err());
    }

    #[test]
    fn test_asset_img_shortcode_args() {
        let shortcode = asset_img_shortcode(&ImageConfig::default());
        let mut args = HashMap::new();
        args.insert("filename".to_string(), Value::from("cat.png"));
        args.insert("alt".to_string(), Value::from("a cat"));
        assert_eq!(
            shortcode(&args).unwrap(),
            Value::from("<img class=\"my-4\" src=\"/assets/img/posts/cat.png\" alt=\"a cat\" />")
        );

        args.remove("alt");
        assert!(shortcode(&args).is_err());
    }
}
