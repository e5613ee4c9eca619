use crate::properties::Properties;
use crate::runtime::{EnvError, Environment};
use crate::segments::{to_context, Binding, Segment};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const BRANCH_ICON: &str = "branch_icon";
pub const FETCH_STATUS: &str = "fetch_status";
pub const FETCH_UPSTREAM: &str = "fetch_upstream";

const DEFAULT_BRANCH_ICON: &str = "\u{e0a0} ";
const DEFAULT_TEMPLATE: &str = "{{ .BranchIcon }}{{ .Branch }}{{ if .Dirty }} *{{ end }}\
{{ if .Ahead }} \u{2191}{{ .Ahead }}{{ end }}{{ if .Behind }} \u{2193}{{ .Behind }}{{ end }}";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitInfo {
    pub branch: String,
    pub branch_icon: String,
    pub detached: bool,
    pub staged: u32,
    pub working: u32,
    pub untracked: u32,
    pub dirty: bool,
    pub upstream: bool,
    pub ahead: u32,
    pub behind: u32,
}

/// Branch and working tree state, read through the `git` command.
#[derive(Default)]
pub struct GitSegment {
    binding: Binding,
    info: GitInfo,
}

impl GitSegment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> &GitInfo {
        &self.info
    }

    fn query(&self, env: &dyn Environment) -> Result<GitInfo, EnvError> {
        let props = self.properties();
        let mut info = GitInfo {
            branch_icon: props.get_string(BRANCH_ICON, DEFAULT_BRANCH_ICON),
            ..GitInfo::default()
        };

        let head = env.run_command("git", &["rev-parse", "--abbrev-ref", "HEAD"])?;
        if head == "HEAD" {
            info.detached = true;
            info.branch = env.run_command("git", &["rev-parse", "--short", "HEAD"])?;
        } else {
            info.branch = head;
        }

        if props.get_bool(FETCH_STATUS, true) {
            let status = env.run_command("git", &["status", "--porcelain=v2"])?;
            let counts = parse_porcelain(&status);
            info.staged = counts.staged;
            info.working = counts.working;
            info.untracked = counts.untracked;
            info.dirty = counts.staged + counts.working + counts.untracked > 0;
        }

        if props.get_bool(FETCH_UPSTREAM, true) && !info.detached {
            // no upstream configured is not a failure
            if let Ok(counts) =
                env.run_command("git", &["rev-list", "--left-right", "--count", "HEAD...@{upstream}"])
            {
                if let Some((ahead, behind)) = parse_ahead_behind(&counts) {
                    info.upstream = true;
                    info.ahead = ahead;
                    info.behind = behind;
                }
            }
        }

        Ok(info)
    }
}

#[derive(Debug, Default, PartialEq)]
struct StatusCounts {
    staged: u32,
    working: u32,
    untracked: u32,
}

/// Count entries in `git status --porcelain=v2` output.
///
/// Every v2 entry starts with a type tag, so the counts hold even after the
/// output has been trimmed.
fn parse_porcelain(status: &str) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for line in status.lines() {
        let mut fields = line.split(' ');
        match fields.next() {
            Some("1") | Some("2") => {
                let mut codes = fields.next().unwrap_or("").chars();
                if codes.next().map_or(false, |x| x != '.') {
                    counts.staged += 1;
                }
                if codes.next().map_or(false, |y| y != '.') {
                    counts.working += 1;
                }
            }
            // unmerged paths still need work in the tree
            Some("u") => counts.working += 1,
            Some("?") => counts.untracked += 1,
            _ => {}
        }
    }
    counts
}

fn parse_ahead_behind(output: &str) -> Option<(u32, u32)> {
    let mut parts = output.split_whitespace();
    let ahead = parts.next()?.parse().ok()?;
    let behind = parts.next()?.parse().ok()?;
    Some((ahead, behind))
}

impl Segment for GitSegment {
    fn name(&self) -> &'static str {
        "git"
    }

    fn init(&mut self, props: Properties, env: Arc<dyn Environment>) {
        self.binding.bind(props, env);
    }

    fn enabled(&mut self) -> bool {
        self.info = GitInfo::default();
        let Some(env) = self.binding.env() else {
            return false;
        };
        if !env.has_command("git") {
            return false;
        }

        match self.query(env) {
            Ok(info) => {
                self.info = info;
                true
            }
            Err(e) => {
                debug!(segment = "git", error = %e, "query failed");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_porcelain() {
        let status = "\
1 M. N... 100644 100644 100644 aaa bbb staged.rs
1 .M N... 100644 100644 100644 aaa aaa changed.rs
1 MM N... 100644 100644 100644 aaa bbb both.rs
2 R. N... 100644 100644 100644 aaa aaa R100 new.rs\told.rs
u UU N... 100644 100644 100644 100644 aaa bbb ccc conflict.rs
? new.rs
? other.rs
! target";
        assert_eq!(
            parse_porcelain(status),
            StatusCounts {
                staged: 3,
                working: 3,
                untracked: 2,
            }
        );
        assert_eq!(parse_porcelain(""), StatusCounts::default());
    }

    #[test]
    fn test_parse_porcelain_survives_trimmed_output() {
        let raw = "1 .M N... 100644 100644 100644 aaa aaa src/lib.rs\n";
        assert_eq!(
            parse_porcelain(raw.trim()),
            StatusCounts {
                staged: 0,
                working: 1,
                untracked: 0,
            }
        );
    }

    #[test]
    fn test_parse_ahead_behind() {
        assert_eq!(parse_ahead_behind("3\t1"), Some((3, 1)));
        assert_eq!(parse_ahead_behind("0 0"), Some((0, 0)));
        assert_eq!(parse_ahead_behind("garbage"), None);
    }
}
