use std::path::{Path, PathBuf};
use std::process::Command;

use crate::downloader::errors::DownloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    YtDlp,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "--version",
            ToolType::Ffmpeg => "-version", // ffmpeg takes a single dash
        }
    }

    /// Env var that pins the binary location
    fn override_var(&self) -> Option<&'static str> {
        match self {
            ToolType::YtDlp => Some("YTDLP_PATH"),
            ToolType::Ffmpeg => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// How to invoke yt-dlp: a native binary, or `python -m yt_dlp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpCommand {
    pub program: String,
    pub base_args: Vec<String>,
}

impl YtDlpCommand {
    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            program: path.into(),
            base_args: Vec::new(),
        }
    }

    pub fn python_module(python: impl Into<String>) -> Self {
        Self {
            program: python.into(),
            base_args: vec!["-m".to_string(), "yt_dlp".to_string()],
        }
    }

    /// Full argument list: base args followed by `args`
    pub fn args_with(&self, args: Vec<String>) -> Vec<String> {
        let mut full = self.base_args.clone();
        full.extend(args);
        full
    }
}

impl std::fmt::Display for YtDlpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base_args.is_empty() {
            write!(f, "{}", self.program)
        } else {
            write!(f, "{} {}", self.program, self.base_args.join(" "))
        }
    }
}

pub struct ToolManager;

impl ToolManager {
    pub fn new() -> Self {
        Self
    }

    pub fn get_tool_info(&self, tool_type: ToolType) -> ToolInfo {
        let path = self.detect_tool(tool_type);
        let version = path.as_deref().and_then(|p| self.get_version(p, tool_type));

        ToolInfo {
            tool_type,
            version,
            path,
        }
    }

    pub fn get_all_tools(&self) -> Vec<ToolInfo> {
        vec![
            self.get_tool_info(ToolType::YtDlp),
            self.get_tool_info(ToolType::Ffmpeg),
        ]
    }

    /// Pick the yt-dlp invocation: native binary first, then the Python
    /// module (interpreter from `YTDLP_PYTHON`, default `python3`).
    pub fn resolve_ytdlp(&self) -> Result<YtDlpCommand, DownloadError> {
        if let Some(path) = self.detect_tool(ToolType::YtDlp) {
            return Ok(YtDlpCommand::binary(path.to_string_lossy()));
        }

        let python = std::env::var("YTDLP_PYTHON").unwrap_or_else(|_| "python3".to_string());
        if python_has_module(&python, "yt_dlp") {
            return Ok(YtDlpCommand::python_module(python));
        }

        Err(DownloadError::ToolNotFound(
            "yt-dlp (install with: pip3 install yt-dlp)".to_string(),
        ))
    }

    fn detect_tool(&self, tool_type: ToolType) -> Option<PathBuf> {
        let binary_name = tool_type.as_str();

        if let Some(var) = tool_type.override_var() {
            if let Ok(custom) = std::env::var(var) {
                let custom = PathBuf::from(custom);
                if custom.exists() {
                    return Some(custom);
                }
                tracing::warn!("{} points to {}, which does not exist", var, custom.display());
            }
        }

        if let Ok(path) = which::which(binary_name) {
            return Some(path);
        }

        // GUI-launched shells on macOS often miss the Homebrew prefix
        let common_dirs = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];
        common_dirs
            .iter()
            .map(|dir| Path::new(dir).join(binary_name))
            .find(|p| p.exists())
    }

    fn get_version(&self, path: &Path, tool_type: ToolType) -> Option<String> {
        match Command::new(path).arg(tool_type.version_arg()).output() {
            Ok(output) if output.status.success() => {
                // ffmpeg prints a banner; the first line carries the version
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .map(|l| l.trim().to_string())
            }
            _ => None,
        }
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

fn python_has_module(python: &str, module: &str) -> bool {
    let code = format!("import {}", module);
    match Command::new(python).args(["-c", &code]).output() {
        Ok(out) => out.status.success(),
        Err(_) => false,
    }
}

/// Log what was found; a missing ffmpeg only breaks post-processing.
pub fn report_tools(manager: &ToolManager) {
    for tool in manager.get_all_tools() {
        match (&tool.path, &tool.version) {
            (Some(path), version) => tracing::debug!(
                "Found {} at {} ({})",
                tool.tool_type.as_str(),
                path.display(),
                version.as_deref().unwrap_or("unknown version")
            ),
            (None, _) if tool.tool_type == ToolType::Ffmpeg => tracing::warn!(
                "ffmpeg not found in PATH; MP3 conversion and thumbnail embedding will fail"
            ),
            (None, _) => tracing::debug!("{} binary not found in PATH", tool.tool_type.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_module_args() {
        let cmd = YtDlpCommand::python_module("python3");
        assert_eq!(
            cmd.args_with(vec!["--version".to_string()]),
            vec!["-m", "yt_dlp", "--version"]
        );
        assert_eq!(cmd.to_string(), "python3 -m yt_dlp");
    }

    #[test]
    fn test_binary_args_pass_through() {
        let cmd = YtDlpCommand::binary("/usr/bin/yt-dlp");
        assert_eq!(cmd.args_with(vec!["-x".to_string()]), vec!["-x"]);
        assert_eq!(cmd.to_string(), "/usr/bin/yt-dlp");
    }

    #[test]
    fn test_missing_interpreter_has_no_module() {
        assert!(!python_has_module("no-such-python-interpreter-4711", "yt_dlp"));
    }
}
