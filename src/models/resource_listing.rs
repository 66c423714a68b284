/// Relative paths of every file bundled into a SCORM package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceListing {
    pub paths: Vec<String>,
}

impl ResourceListing {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    /// Drop the entries equal to `path` (used to keep the manifest out of its own listing)
    pub fn without(mut self, path: &str) -> Self {
        self.paths.retain(|p| p != path);
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// One `<file href="..."/>` element per path, each on its own line
    pub fn to_xml_fragment(&self) -> String {
        self.paths
            .iter()
            .map(|path| format!("<file href=\"{}\"/>\n", escape_xml_attr(path)))
            .collect()
    }
}

fn escape_xml_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
