use url::Url;

/// Hosts serving `/watch?v=<id>` pages.
const LONG_FORM_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

/// Hosts serving `/<id>` short links.
const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

/// Extract the video identifier from a YouTube link.
///
/// Long-form links yield the `v` query parameter, short links yield the path
/// without its leading slash. Anything else yields `None`.
pub fn parse_video_id(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    let id = if LONG_FORM_HOSTS.contains(&host.as_str()) {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?
    } else if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        url.path().trim_start_matches('/').to_string()
    } else {
        return None;
    };

    if id.is_empty() { None } else { Some(id) }
}
