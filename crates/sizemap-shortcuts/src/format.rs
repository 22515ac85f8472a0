//! Shortcut file formats.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kind of pointer file to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutFormat {
    /// macOS `.webloc` property list; opens in Finder.
    Webloc,
    /// freedesktop `.desktop` link entry.
    Desktop,
}

impl ShortcutFormat {
    /// Native format for the current platform.
    pub fn native() -> Self {
        if cfg!(target_os = "macos") {
            ShortcutFormat::Webloc
        } else {
            ShortcutFormat::Desktop
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ShortcutFormat::Webloc => "webloc",
            ShortcutFormat::Desktop => "desktop",
        }
    }

    /// File contents pointing at `target`.
    pub fn render(&self, name: &str, target: &Path) -> String {
        let url = file_url(target);
        match self {
            ShortcutFormat::Webloc => format!(
                concat!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                    "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" ",
                    "\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
                    "<plist version=\"1.0\">\n",
                    "<dict>\n",
                    "\t<key>URL</key>\n",
                    "\t<string>{}</string>\n",
                    "</dict>\n",
                    "</plist>\n",
                ),
                escape_xml(&url)
            ),
            ShortcutFormat::Desktop => format!(
                "[Desktop Entry]\nType=Link\nName={}\nURL={}\n",
                name.replace(['\n', '\r'], " "),
                url
            ),
        }
    }
}

impl Default for ShortcutFormat {
    fn default() -> Self {
        Self::native()
    }
}

/// `file://` URL for a local path. Spaces are percent-encoded.
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.to_string_lossy().replace(' ', "%20"))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_encodes_spaces() {
        assert_eq!(
            file_url(Path::new("/Users/me/My Movies")),
            "file:///Users/me/My%20Movies"
        );
    }

    #[test]
    fn test_webloc_contents() {
        let body = ShortcutFormat::Webloc.render("a&b", Path::new("/data/a&b"));
        assert!(body.starts_with("<?xml"));
        assert!(body.contains("<key>URL</key>"));
        assert!(body.contains("<string>file:///data/a&amp;b</string>"));
    }

    #[test]
    fn test_desktop_contents() {
        let body = ShortcutFormat::Desktop.render("video", Path::new("/srv/video"));
        assert_eq!(
            body,
            "[Desktop Entry]\nType=Link\nName=video\nURL=file:///srv/video\n"
        );
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ShortcutFormat::Webloc.extension(), "webloc");
        assert_eq!(ShortcutFormat::Desktop.extension(), "desktop");
    }
}
