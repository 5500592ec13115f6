//! Response text helpers shared by the strategies
//!
//! Responses use the HTML fragments the chat front-end expects: `<br>` line
//! breaks and a four-`&nbsp;` indent in front of list items.

/// List item indent
pub const TAB: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Indented list item: `TAB- item <br>`
pub fn bullet(item: &str) -> String {
    format!("{}- {} <br>", TAB, item)
}

/// Last segment of an IRI after the final `/` or `#`
pub fn short_name(uri: &str) -> &str {
    let uri = uri.trim_start_matches('<').trim_end_matches('>');
    uri.rsplit(['/', '#']).next().unwrap_or(uri)
}

/// Data-source label of an IRI: the text between `//` and `#`, or up to the
/// last `/` when there is no fragment
pub fn authority(uri: &str) -> &str {
    let uri = uri.trim_start_matches('<').trim_end_matches('>');
    let rest = match uri.find("//") {
        Some(i) => &uri[i + 2..],
        None => uri,
    };
    if let Some(end) = rest.find('#') {
        &rest[..end]
    } else if let Some(end) = rest.rfind('/') {
        &rest[..end]
    } else {
        rest
    }
}

/// Splits a camel-case identifier into words; the first word keeps its
/// case and the rest are lowercased.
///
/// `MonitorExistingWildfires_24_7BySpacecraftSystemSegment` becomes
/// `Monitor existing wildfires_24_7 by spacecraft system segment`, and
/// acronyms stay together (`GPSReceiverUnit` becomes `GPS receiver unit`).
pub fn humanize_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if !prev.is_uppercase() || next_is_lower {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .filter(|w| !w.is_empty())
        .enumerate()
        .map(|(i, w)| {
            if i == 0 || (w.chars().count() > 1 && w.chars().all(|c| !c.is_lowercase())) {
                w.clone()
            } else {
                w.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts response markup to plain terminal text
pub fn to_plain(markup: &str) -> String {
    markup
        .replace(" <br>\n ", "\n")
        .replace(" <br> ", "\n")
        .replace("<br>", "\n")
        .replace("&nbsp;", " ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("http://www.w3.org/2002/07/owl#imports"), "imports");
        assert_eq!(short_name("http://purl.org/dc/elements/1.1/title"), "title");
        assert_eq!(short_name("<http://example.org/a#B>"), "B");
        assert_eq!(short_name("plain"), "plain");
    }

    #[test]
    fn test_authority() {
        assert_eq!(authority("http://bipm.org/jcgm/vim4#describes"), "bipm.org/jcgm/vim4");
        assert_eq!(
            authority("<http://imce.jpl.nasa.gov/foundation/project#describes>"),
            "imce.jpl.nasa.gov/foundation/project"
        );
        assert_eq!(authority("http://purl.org/dc/elements/1.1/title"), "purl.org/dc/elements/1.1");
        assert_eq!(authority("http://example.org"), "example.org");
    }

    #[test]
    fn test_humanize_identifier() {
        assert_eq!(
            humanize_identifier("MonitorExistingWildfires_24_7BySpacecraftSystemSegment"),
            "Monitor existing wildfires_24_7 by spacecraft system segment"
        );
        assert_eq!(
            humanize_identifier("PerformMissionBySpacecraftSystemSegment"),
            "Perform mission by spacecraft system segment"
        );
        assert_eq!(humanize_identifier("GPSReceiverUnit"), "GPS receiver unit");
        assert_eq!(humanize_identifier("EPSRegulatorsAndConvertersUnit"), "EPS regulators and converters unit");
        assert_eq!(humanize_identifier("Magnetometer"), "Magnetometer");
        assert_eq!(humanize_identifier(""), "");
    }

    #[test]
    fn test_bullet_and_plain() {
        assert_eq!(bullet("x"), "&nbsp;&nbsp;&nbsp;&nbsp;- x <br>");
        assert_eq!(
            to_plain("For assembly object 1: <br>\n The mass is 2 kg. <br>\n "),
            "For assembly object 1:\nThe mass is 2 kg."
        );
        assert_eq!(
            to_plain("The subclasses for 'X' are:<br>&nbsp;&nbsp;&nbsp;&nbsp;- A <br> "),
            "The subclasses for 'X' are:\n    - A"
        );
    }
}
