use crate::properties::Properties;
use crate::runtime::Environment;
use crate::segments::{to_context, Binding, Segment};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub const HOME_ICON: &str = "home_icon";

const DEFAULT_HOME_ICON: &str = "~";
const DEFAULT_TEMPLATE: &str = "{{ .Path }}";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathData {
    /// Working directory with the home folder replaced by the home icon.
    pub path: String,
    /// Last component of the working directory.
    pub folder: String,
    pub in_home: bool,
}

#[derive(Default)]
pub struct PathSegment {
    binding: Binding,
    data: PathData,
}

impl PathSegment {
    pub fn new() -> Self {
        Self::default()
    }
}

fn home_dir(env: &dyn Environment) -> Option<String> {
    env.getenv("HOME")
        .or_else(|| env.getenv("USERPROFILE"))
        .filter(|home| !home.is_empty())
}

fn fold_home(pwd: &Path, home: Option<&str>, icon: &str) -> (String, bool) {
    if let Some(home) = home {
        if let Ok(rest) = pwd.strip_prefix(home) {
            if rest.as_os_str().is_empty() {
                return (icon.to_string(), true);
            }
            let separator = std::path::MAIN_SEPARATOR;
            return (format!("{}{}{}", icon, separator, rest.display()), true);
        }
    }
    (pwd.display().to_string(), false)
}

impl Segment for PathSegment {
    fn name(&self) -> &'static str {
        "path"
    }

    fn init(&mut self, props: Properties, env: Arc<dyn Environment>) {
        self.binding.bind(props, env);
    }

    fn enabled(&mut self) -> bool {
        self.data = PathData::default();
        let Some(env) = self.binding.env() else {
            return false;
        };

        let pwd = match env.pwd() {
            Ok(pwd) => pwd,
            Err(e) => {
                debug!(segment = "path", error = %e, "query failed");
                return false;
            }
        };

        let icon = self.properties().get_string(HOME_ICON, DEFAULT_HOME_ICON);
        let (path, in_home) = fold_home(&pwd, home_dir(env).as_deref(), &icon);
        let folder = match pwd.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => path.clone(),
        };

        self.data = PathData {
            path,
            folder,
            in_home,
        };
        true
    }

    fn default_template(&self) -> &'static str {
        DEFAULT_TEMPLATE
    }

    fn properties(&self) -> &Properties {
        self.binding.props()
    }

    fn context(&self) -> Value {
        to_context(self.name(), &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_home() {
        let (path, in_home) = fold_home(Path::new("/home/user"), Some("/home/user"), "~");
        assert_eq!(path, "~");
        assert!(in_home);

        let (path, in_home) = fold_home(Path::new("/srv/data"), Some("/home/user"), "~");
        assert_eq!(path, "/srv/data");
        assert!(!in_home);
    }

    #[test]
    fn test_fold_home_is_component_aware() {
        let (path, in_home) = fold_home(Path::new("/home/username"), Some("/home/user"), "~");
        assert_eq!(path, "/home/username");
        assert!(!in_home);
    }
}
