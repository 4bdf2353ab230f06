//! Module identifier decomposition.
//!
//! A module identifier has the shape `path/name@version`, for example
//! `golang.org/x/sys@v0.0.0-20191010194322-b09`. Every function here keys off
//! the *last* `@` and the *last* `/`, so malformed identifiers never fail,
//! they just split somewhere predictable.

/// Returns the substring after the last `@`, or `""` when there is none.
///
/// # Example
///
/// ```
/// use modv::parser::identifier::version;
///
/// assert_eq!(version("github.com/fatih/color@v1.7.0"), "v1.7.0");
/// assert_eq!(version("github.com/fatih/color"), "");
/// ```
pub fn version(id: &str) -> &str {
    match id.rfind('@') {
        Some(index) => &id[index + 1..],
        None => "",
    }
}

/// Returns `id` with its trailing `@version` removed.
///
/// Identifiers without an `@` are returned unchanged.
///
/// # Example
///
/// ```
/// use modv::parser::identifier::without_version;
///
/// assert_eq!(without_version("rsc.io/quote/v3@v3.1.0"), "rsc.io/quote/v3");
/// assert_eq!(without_version("rsc.io/quote/v3"), "rsc.io/quote/v3");
/// ```
pub fn without_version(id: &str) -> &str {
    match id.rfind('@') {
        Some(index) => &id[..index],
        None => id,
    }
}

/// Returns everything before the last `/` of the version-stripped identifier.
pub fn path(id: &str) -> &str {
    let id = without_version(id);
    match id.rfind('/') {
        Some(index) => &id[..index],
        None => "",
    }
}

/// Returns the last path segment of the version-stripped identifier.
pub fn name(id: &str) -> &str {
    let id = without_version(id);
    match id.rfind('/') {
        Some(index) => &id[index + 1..],
        None => id,
    }
}

/// The three components of a module identifier, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleParts<'a> {
    pub path: &'a str,
    pub name: &'a str,
    pub version: &'a str,
}

impl<'a> ModuleParts<'a> {
    /// Splits `id` into path, name and version.
    ///
    /// ```
    /// use modv::parser::ModuleParts;
    ///
    /// let parts = ModuleParts::parse("golang.org/x/text@v0.3.2");
    /// assert_eq!(parts.path, "golang.org/x");
    /// assert_eq!(parts.name, "text");
    /// assert_eq!(parts.version, "v0.3.2");
    /// ```
    pub fn parse(id: &'a str) -> Self {
        Self {
            path: path(id),
            name: name(id),
            version: version(id),
        }
    }
}
