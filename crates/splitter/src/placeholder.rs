//! Link and image placeholders.
//!
//! Targets of `![alt](target)` and `[text](target)` are moved out of the text
//! into ordered lists and replaced by `{$img<i>}` / `{$url<i>}` tokens. Images
//! are always processed before links.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn image_regex() -> &'static Regex {
    static IMAGE: OnceLock<Regex> = OnceLock::new();
    IMAGE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image pattern is valid"))
}

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid"))
}

fn image_placeholder_regex() -> &'static Regex {
    static IMAGE_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    IMAGE_PLACEHOLDER.get_or_init(|| {
        Regex::new(r"!\[([^\]]*)\]\(\{\$img(\d+)\}\)").expect("image placeholder pattern is valid")
    })
}

fn url_placeholder_regex() -> &'static Regex {
    static URL_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    URL_PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\[([^\]]*)\]\(\{\$url(\d+)\}\)").expect("url placeholder pattern is valid")
    })
}

/// Placeholder for the image at `index`.
pub fn image_placeholder(index: usize) -> String {
    format!("{{$img{}}}", index)
}

/// Placeholder for the link at `index`.
pub fn url_placeholder(index: usize) -> String {
    format!("{{$url{}}}", index)
}

/// Span text with its link and image targets pulled out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub urls: Vec<String>,
    pub images: Vec<String>,
}

/// Replace image and link targets in `span` with indexed placeholders.
pub fn extract(span: &str) -> Extraction {
    let mut images = Vec::new();
    let with_images = image_regex().replace_all(span, |caps: &Captures| {
        let placeholder = image_placeholder(images.len());
        images.push(caps[2].to_string());
        format!("![{}]({})", &caps[1], placeholder)
    });

    // Image syntax also matches the link pattern from its `[`; those are
    // already placeholders and are skipped.
    let mut urls = Vec::new();
    let mut text = String::with_capacity(with_images.len());
    let mut last = 0;

    for caps in link_regex().captures_iter(&with_images) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if with_images[..whole.start()].ends_with('!') {
            continue;
        }

        text.push_str(&with_images[last..whole.start()]);
        text.push_str(&format!("[{}]({})", &caps[1], url_placeholder(urls.len())));
        urls.push(caps[2].to_string());
        last = whole.end();
    }
    text.push_str(&with_images[last..]);

    Extraction { text, urls, images }
}

/// Put link and image targets back in place of their placeholders.
///
/// Underscores in link text come back escaped as `\_`. Placeholders whose
/// index has no entry are left untouched.
pub fn restore(text: &str, urls: &[String], images: &[String]) -> String {
    let with_images = image_placeholder_regex().replace_all(text, |caps: &Captures| {
        match caps[2].parse::<usize>().ok().and_then(|idx| images.get(idx)) {
            Some(target) => format!("![{}]({})", &caps[1], target),
            None => caps[0].to_string(),
        }
    });

    url_placeholder_regex()
        .replace_all(&with_images, |caps: &Captures| {
            match caps[2].parse::<usize>().ok().and_then(|idx| urls.get(idx)) {
                Some(target) => format!("[{}]({})", caps[1].replace('_', "\\_"), target),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_then_link() {
        let extraction = extract("See ![logo](http://img/1.png) and [site](http://link/1).");
        assert_eq!(
            extraction.text,
            "See ![logo]({$img0}) and [site]({$url0})."
        );
        assert_eq!(extraction.images, vec!["http://img/1.png"]);
        assert_eq!(extraction.urls, vec!["http://link/1"]);
    }

    #[test]
    fn test_extract_indices_in_order() {
        let extraction = extract("[a](u1) ![x](i1) [b](u2) ![](i2)");
        assert_eq!(
            extraction.text,
            "[a]({$url0}) ![x]({$img0}) [b]({$url1}) ![]({$img1})"
        );
        assert_eq!(extraction.urls, vec!["u1", "u2"]);
        assert_eq!(extraction.images, vec!["i1", "i2"]);
    }

    #[test]
    fn test_extract_adjacent_image_and_link() {
        let extraction = extract("![a](b)[c](d)");
        assert_eq!(extraction.text, "![a]({$img0})[c]({$url0})");
        assert_eq!(extraction.images, vec!["b"]);
        assert_eq!(extraction.urls, vec!["d"]);
    }

    #[test]
    fn test_malformed_passes_through() {
        let text = "[] (x) ![alt] (y) [empty]() [open](no close";
        let extraction = extract(text);
        assert_eq!(extraction.text, text);
        assert!(extraction.urls.is_empty());
        assert!(extraction.images.is_empty());
    }

    #[test]
    fn test_restore_round_trip() {
        let source = "Intro ![logo](http://img/1.png)\n[site](http://link/1?a=$1) and [more](http://x/y)";
        let extraction = extract(source);
        let restored = restore(&extraction.text, &extraction.urls, &extraction.images);
        assert_eq!(restored, source);
    }

    #[test]
    fn test_restore_escapes_link_text_underscores() {
        let source = "[snake_case_name](http://a/b_c) ![img_alt](http://i/x_y.png)";
        let extraction = extract(source);
        let restored = restore(&extraction.text, &extraction.urls, &extraction.images);
        assert_eq!(
            restored,
            "[snake\\_case\\_name](http://a/b_c) ![img_alt](http://i/x_y.png)"
        );
    }

    #[test]
    fn test_restore_unknown_index_untouched() {
        let restored = restore("[a]({$url3}) ![b]({$img1})", &["u".to_string()], &[]);
        assert_eq!(restored, "[a]({$url3}) ![b]({$img1})");
    }

    #[test]
    fn test_restore_many_indices() {
        let targets: Vec<String> = (0..12).map(|i| format!("http://t/{}", i)).collect();
        let text: String = (0..12).map(|i| format!("[l{}]({}) ", i, targets[i])).collect();
        let extraction = extract(&text);
        assert!(extraction.text.contains("[l11]({$url11})"));
        assert_eq!(restore(&extraction.text, &extraction.urls, &[]), text);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(image_placeholder(2), "{$img2}");
        assert_eq!(url_placeholder(0), "{$url0}");
    }
}
