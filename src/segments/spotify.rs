use crate::properties::Properties;
use crate::runtime::{EnvError, Environment, Os};
use crate::segments::{to_context, Binding, Segment};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const PLAYING_ICON: &str = "playing_icon";
pub const PAUSED_ICON: &str = "paused_icon";

const DEFAULT_PLAYING_ICON: &str = "\u{e602} ";
const DEFAULT_PAUSED_ICON: &str = "\u{f8e3} ";
const DEFAULT_TEMPLATE: &str = "{{ .Icon }}{{ .Artist }} - {{ .Track }}";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrackInfo {
    pub status: String,
    pub artist: String,
    pub track: String,
    pub icon: String,
}

/// Now playing in Spotify.
#[derive(Default)]
pub struct SpotifySegment {
    binding: Binding,
    info: TrackInfo,
}

impl SpotifySegment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> &TrackInfo {
        &self.info
    }

    fn query(&self, env: &dyn Environment) -> Result<Option<TrackInfo>, EnvError> {
        let (status, artist, track) = match env.os() {
            Os::MacOs => {
                if osascript(env, "application \"Spotify\" is running")? != "true" {
                    return Ok(None);
                }
                (
                    osascript(env, "tell application \"Spotify\" to player state as string")?,
                    osascript(env, "tell application \"Spotify\" to artist of current track as string")?,
                    osascript(env, "tell application \"Spotify\" to name of current track as string")?,
                )
            }
            Os::Linux => {
                // playerctl fails when no Spotify instance is on the session bus
                let status = playerctl(env, &["status"])?.to_lowercase();
                (
                    status,
                    playerctl(env, &["metadata", "artist"])?,
                    playerctl(env, &["metadata", "title"])?,
                )
            }
            Os::Windows | Os::Other => return Ok(None),
        };

        // running but with nothing loaded
        if status.is_empty() || (artist.is_empty() && track.is_empty()) {
            return Ok(None);
        }

        let props = self.properties();
        let icon = if status == "playing" {
            props.get_string(PLAYING_ICON, DEFAULT_PLAYING_ICON)
        } else {
            props.get_string(PAUSED_ICON, DEFAULT_PAUSED_ICON)
        };

        Ok(Some(TrackInfo {
            status,
            artist,
            track,
            icon,
        }))
    }
}

fn osascript(env: &dyn Environment, script: &str) -> Result<String, EnvError> {
    env.run_command("osascript", &["-e", script])
}

fn playerctl(env: &dyn Environment, args: &[&str]) -> Result<String, EnvError> {
    let mut full = vec!["--player=spotify"];
    full.extend_from_slice(args);
    env.run_command("playerctl", &full)
}

impl Segment for SpotifySegment {
    fn name(&self) -> &'static str {
        "spotify"
    }

    fn init(&mut self, props: Properties, env: Arc<dyn Environment>) {
        self.binding.bind(props, env);
    }

    fn enabled(&mut self) -> bool {
        self.info = TrackInfo::default();
        let Some(env) = self.binding.env() else {
            return false;
        };

        match self.query(env) {
            Ok(Some(info)) => {
                self.info = info;
                true
            }
            Ok(None) => false,
            Err(e) => {
                debug!(segment = "spotify", error = %e, "query failed");
                false
            }
        }
    }

    fn default_template(&self) -> &'static str {
        DEFAULT_TEMPLATE
    }

    fn properties(&self) -> &Properties {
        self.binding.props()
    }

    fn context(&self) -> Value {
        to_context(self.name(), &self.info)
    }
}
