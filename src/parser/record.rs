//! Edge records: one `parent child` pair per input line.

/// A single dependency relation read from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord<'a> {
    /// The module that declares the dependency
    pub parent: &'a str,
    /// The module being depended on
    pub child: &'a str,
}

impl<'a> EdgeRecord<'a> {
    /// Splits a line into its parent and child identifiers.
    ///
    /// Tokens are separated by whitespace; anything after the second token is
    /// ignored. Returns `None` if the line holds fewer than two tokens.
    ///
    /// # Example
    ///
    /// ```
    /// use modv::parser::EdgeRecord;
    ///
    /// let record = EdgeRecord::parse("example.com/app golang.org/x/text@v0.3.2\n").unwrap();
    /// assert_eq!(record.parent, "example.com/app");
    /// assert_eq!(record.child, "golang.org/x/text@v0.3.2");
    ///
    /// assert!(EdgeRecord::parse("onlyonetoken").is_none());
    /// ```
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let parent = tokens.next()?;
        let child = tokens.next()?;
        Some(Self { parent, child })
    }
}
