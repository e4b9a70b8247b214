use std::fmt::{self, Display, Formatter};



/// The location in the source code where a token was found.  Used all over the runtime to keep
/// track of where things came from, mostly for error reporting.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, PartialEq, Eq, PartialOrd, Hash, Debug)]
pub struct SourceLocation
{
    /// Either the path to the file or a description of the source.  Lines entered in the REPL
    /// carry a name of "\<repl\>".
    path: String,

    /// The 1 based line number.
    line: usize,

    /// The 1 based column number.
    column: usize
}


impl Default for SourceLocation
{
    fn default() -> Self
    {
        Self::new()
    }
}


/// Used for error reporting to show where in the source code an error originated.
impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result
    {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}


impl SourceLocation
{
    /// Create a new SourceLocation with default values.
    pub fn new() -> SourceLocation
    {
        SourceLocation { path: "unspecified".to_string(), line: 1, column: 1 }
    }

    /// Create a location pointing at the start of the named source.
    pub fn new_from_path(path: &str) -> Self
    {
        SourceLocation { path: path.to_owned(), line: 1, column: 1 }
    }

    /// Create a new SourceLocation with all of the needed information.  Useful in conjunction
    /// with the location_here! macro.
    pub fn new_from_info(path: &str, line: usize, column: usize) -> Self
    {
        SourceLocation { path: path.to_owned(), line, column }
    }

    /// The path to the source code or a meaningful description of it.
    pub fn path(&self) -> &String
    {
        &self.path
    }

    /// The 1 based line number in the source code.
    pub fn line(&self) -> usize
    {
        self.line
    }

    /// The 1 based column number in the source code.
    pub fn column(&self) -> usize
    {
        self.column
    }
}



/// Get the location of the macro invocation within the Rust code.  Used when native code needs to
/// report where something was triggered from.
#[macro_export]
macro_rules! location_here
{
    () =>
    {
        $crate::lang::source_buffer::SourceLocation::new_from_info(file!(),
                                                                   line!() as usize,
                                                                   column!() as usize)
    };
}



/// The character source the tokenizer reads from.  The whole source is held in memory, so the
/// buffer can peek ahead, consume, and push characters back one step at a time while keeping the
/// cursor's line and column up to date.
pub struct SourceBuffer
{
    /// Name of the source, either a file path or a tag like "\<repl\>".
    name: String,

    /// The fully materialized source text.
    chars: Vec<char>,

    /// Index of the next character to be consumed.
    index: usize,

    /// The logical location of the cursor.
    location: SourceLocation
}


impl SourceBuffer
{
    /// Create a new buffer over the given source text.  The name is used for locations and error
    /// reporting.
    pub fn new(name: &str, source: &str) -> Self
    {
        SourceBuffer
            {
                name: name.to_string(),
                chars: source.chars().collect(),
                index: 0,
                location: SourceLocation::new_from_path(name)
            }
    }

    /// The name of the source being read.
    pub fn source_name(&self) -> &str
    {
        &self.name
    }

    /// The location the cursor is at in the source code.
    pub fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    /// Have all of the characters been consumed?
    pub fn at_end(&self) -> bool
    {
        self.index >= self.chars.len()
    }

    /// Is the cursor at the very beginning of the source?
    pub fn at_start(&self) -> bool
    {
        self.index == 0
    }

    /// Take a peek at the next character without consuming it.
    pub fn peek_next(&self) -> Option<char>
    {
        self.chars.get(self.index).copied()
    }

    /// Get and consume the next character.
    pub fn next_char(&mut self) -> Option<char>
    {
        let next = self.peek_next()?;

        self.index += 1;

        if next == '\n'
        {
            self.location.line += 1;
            self.location.column = 1;
        }
        else
        {
            self.location.column += 1;
        }

        Some(next)
    }

    /// Un-consume the most recently consumed character.  Returns false if the cursor is already at
    /// the start of the source.
    pub fn push_back(&mut self) -> bool
    {
        if self.at_start()
        {
            return false;
        }

        self.index -= 1;

        if self.chars[self.index] == '\n'
        {
            // Walk back to the previous line's start to find the column we were on.
            let line_start = self.chars[..self.index]
                .iter()
                .rposition(|c| *c == '\n')
                .map(|position| position + 1)
                .unwrap_or(0);

            self.location.line -= 1;
            self.location.column = self.index - line_start + 1;
        }
        else
        {
            self.location.column -= 1;
        }

        true
    }
}
