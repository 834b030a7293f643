// Page fixtures shaped like the host's watch page markup.

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=jfKfPfyJRdk";
pub const OTHER_WATCH_URL: &str = "https://www.youtube.com/watch?v=4xDzrJKXOOY";
pub const HOME_URL: &str = "https://www.youtube.com/";

fn player(playing: bool) -> &'static str {
    if playing {
        r#"<div id="movie_player" class="html5-video-player ytp-hide-info-bar playing-mode"></div>"#
    } else {
        r#"<div id="movie_player" class="html5-video-player ytp-hide-info-bar paused-mode"></div>"#
    }
}

fn upload_info(channel: Option<&str>) -> String {
    match channel {
        Some(name) => format!(
            r#"<div id="upload-info"><ytd-channel-name id="channel-name"><div id="container"><div id="text-container"><yt-formatted-string id="text"><a href="/@channel">{name}</a></yt-formatted-string></div></div></ytd-channel-name></div>"#
        ),
        None => r#"<div id="upload-info"></div>"#.to_string(),
    }
}

const CHAT: &str = r#"<div id="chat-container"><ytd-live-chat-frame id="chat"><iframe id="chatframe" src="/live_chat?v=jfKfPfyJRdk"></iframe></ytd-live-chat-frame></div>"#;

fn page(body: String) -> String {
    format!("<!DOCTYPE html><html><head><title>watch</title></head><body>{body}</body></html>")
}

pub fn live_page(channel: &str, playing: bool) -> String {
    page(format!(
        "{}{}{}",
        player(playing),
        upload_info(Some(channel)),
        CHAT
    ))
}

pub fn live_page_without_channel(playing: bool) -> String {
    page(format!("{}{}{}", player(playing), upload_info(None), CHAT))
}

pub fn vod_page(channel: &str, playing: bool) -> String {
    page(format!("{}{}", player(playing), upload_info(Some(channel))))
}
