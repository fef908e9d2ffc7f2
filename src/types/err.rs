/*!
Error types used in the library.

- Some of these are external --- e.g. a parse error is reported to whoever supplied the
  formula, with enough position information to locate the issue.
- Others should never occur during use, and exist to avoid panics on states the type
  system cannot rule out.

Within the search core conflicts and empty terms are *not* errors.
These are expected outcomes of propagation, carried by return values as a reference to
the offending constraint together with its kind.
*/

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An error when building a solver.
    Build(BuildError),

    /// An error related to parsing.
    Parse(ParseError),

    /// An error in the constraint database.
    ConstraintDB(ConstraintDBError),
}

/// Noted errors when building a solver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// A constraint was added after the solve started.
    SolveStarted,

    /// A literal mentions an atom which has not been added.
    UnknownAtom,
}

impl From<BuildError> for ErrorKind {
    fn from(e: BuildError) -> Self {
        ErrorKind::Build(e)
    }
}

/// Errors during parsing, each noting the (1-based) line at which the issue was found.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Some issue with the problem line of a QDIMACS input.
    ProblemSpecification(usize),

    /// A quantifier block after the first clause of a QDIMACS input.
    MisplacedQuantifier(usize),

    /// An atom was bound by two quantifiers.
    Requantification(usize),

    /// A literal could not be read.
    Literal(usize),

    /// A clause without a closing zero.
    MissingDelimiter(usize),

    /// A malformed gate definition or quantifier line in a QCIR input.
    Gate(usize),

    /// A gate or variable referenced before any definition.
    UnknownName(usize),

    /// A QCIR input without an output line.
    MissingOutput,

    /// Neither a QDIMACS nor a QCIR header was found.
    UnknownFormat,

    /// An empty string, where some non-empty string was required.
    Empty,
}

impl ParseError {
    /// The line the error was found at, if noted.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::ProblemSpecification(l)
            | Self::MisplacedQuantifier(l)
            | Self::Requantification(l)
            | Self::Literal(l)
            | Self::MissingDelimiter(l)
            | Self::Gate(l)
            | Self::UnknownName(l) => Some(*l),
            Self::MissingOutput | Self::UnknownFormat | Self::Empty => None,
        }
    }
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProblemSpecification(l) => write!(f, "line {l}: malformed problem line"),
            Self::MisplacedQuantifier(l) => {
                write!(f, "line {l}: quantifier block after the first clause")
            }
            Self::Requantification(l) => write!(f, "line {l}: atom quantified twice"),
            Self::Literal(l) => write!(f, "line {l}: malformed literal"),
            Self::MissingDelimiter(l) => write!(f, "line {l}: missing terminating zero"),
            Self::Gate(l) => write!(f, "line {l}: malformed gate or quantifier line"),
            Self::UnknownName(l) => write!(f, "line {l}: reference to an undefined name"),
            Self::MissingOutput => write!(f, "no output line"),
            Self::UnknownFormat => write!(f, "unrecognised input format"),
            Self::Empty => write!(f, "empty input where content was required"),
        }
    }
}

/// Errors in the constraint database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstraintDBError {
    /// A reference which does not resolve to a stored constraint.
    InvalidReference,

    /// The arena cannot hold further constraints.
    StorageExhausted,
}

impl From<ConstraintDBError> for ErrorKind {
    fn from(e: ConstraintDBError) -> Self {
        ErrorKind::ConstraintDB(e)
    }
}
