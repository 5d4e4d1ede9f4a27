use thiserror::Error;

/// The full error taxonomy for the assembler pipeline.
///
/// Every line-attributable variant carries a `line` field so the CLI can
/// print `<file>:<line>: <message>`. Each stage accumulates these into a
/// `Vec<AssemblerError>` instead of stopping at the first one, since the
/// pre-assembler and both passes are required to keep reporting
/// diagnostics for the rest of the file after a bad line.
#[derive(Error, Debug, PartialEq)]
pub enum AssemblerError {
    #[error("line {line}: line exceeds 80 characters")]
    LineTooLong { line: usize },

    #[error("line {line}: label too long (max 30 characters)")]
    LabelTooLong { line: usize },

    #[error("line {line}: malformed label syntax")]
    MalformedLabel { line: usize },

    #[error("line {line}: label '{name}' collides with a reserved mnemonic or register name")]
    ReservedLabelName { line: usize, name: String },

    #[error("line {line}: duplicate symbol definition '{name}'")]
    DuplicateSymbol { line: usize, name: String },

    #[error("line {line}: 'mcro' used inside another macro definition")]
    NestedMacroDefinition { line: usize },

    #[error("line {line}: missing or illegal macro name")]
    IllegalMacroName { line: usize },

    #[error("line {line}: macro name too long (max 30 characters)")]
    MacroNameTooLong { line: usize },

    #[error("line {line}: extra tokens after '{keyword}'")]
    ExtraMacroTokens { line: usize, keyword: &'static str },

    #[error("line {line}: macro name '{name}' collides with a label defined in the source")]
    MacroLabelCollision { line: usize, name: String },

    #[error("line {line}: duplicate macro definition '{name}'")]
    DuplicateMacro { line: usize, name: String },

    #[error("line {line}: macro body for '{name}' is too long")]
    MacroBodyTooLarge { line: usize, name: String },

    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: wrong operand count for '{mnemonic}' (expected {expected}, found {found})")]
    WrongOperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: illegal source addressing mode for '{mnemonic}'")]
    IllegalSourceMode { line: usize, mnemonic: String },

    #[error("line {line}: illegal destination addressing mode for '{mnemonic}'")]
    IllegalDestMode { line: usize, mnemonic: String },

    #[error("line {line}: bad numeric literal '{text}'")]
    BadNumericLiteral { line: usize, text: String },

    #[error("line {line}: unterminated or empty string literal")]
    BadStringLiteral { line: usize },

    #[error("line {line}: missing operand for '.{directive}'")]
    MissingDirectiveOperand { line: usize, directive: &'static str },

    #[error("line {line}: '.{directive}' takes exactly one symbol")]
    MalformedDirectiveOperand { line: usize, directive: &'static str },

    #[error("line {line}: name '{name}' is reserved and cannot be used with '.{directive}'")]
    ReservedDirectiveName {
        line: usize,
        name: String,
        directive: &'static str,
    },

    #[error("line {line}: duplicate extern symbol '{name}'")]
    DuplicateExtern { line: usize, name: String },

    #[error("line {line}: undefined entry symbol '{name}'")]
    UndefinedEntry { line: usize, name: String },

    #[error("line {line}: extern symbol '{name}' cannot be declared as an entry")]
    ExternCannotBeEntry { line: usize, name: String },

    #[error("undefined symbol '{name}' referenced at line {line}")]
    UndefinedSymbol { line: usize, name: String },

    #[error("extern symbol '{name}' referenced with relative addressing at line {line}")]
    ExternUsedRelatively { line: usize, name: String },

    #[error("line {line}: syntax error: {message}")]
    Syntax { line: usize, message: String },

    #[error("{path}: {message}")]
    Io { path: String, message: String },
}

impl AssemblerError {
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        AssemblerError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
