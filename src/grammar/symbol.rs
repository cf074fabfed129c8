use crate::convert::{ArgumentConversionResult, Value};
use crate::model::Arity;
use crate::tree::ArgumentResult;

/// A stable handle to a symbol within its [`Grammar`](crate::Grammar) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    pub(crate) fn index(&self) -> usize {
        self.0
    }
}

/// A user-supplied token-to-value converter.
///
/// Always returns the tagged [`ArgumentConversionResult`]; there is no
/// plain-value escape hatch.
pub type ConvertFn = Box<dyn Fn(&mut ArgumentResult) -> ArgumentConversionResult + Send + Sync>;

/// A user-supplied default-value factory.
///
/// Invoked with a fresh, scoped [`ArgumentResult`] so the factory can report
/// domain errors through the same channel as conversion.
pub type DefaultFn = Box<dyn Fn(&mut ArgumentResult) -> Option<Value> + Send + Sync>;

#[derive(Debug)]
pub(crate) enum SymbolKind {
    Command { children: Vec<SymbolId> },
    Option { required: bool, global: bool, greedy: bool },
    Argument,
}

pub(crate) struct SymbolData {
    aliases: Vec<String>,
    kind: SymbolKind,
    arity: Arity,
    parent: Option<SymbolId>,
    help: Option<String>,
    suggestions: Vec<String>,
    converter: Option<ConvertFn>,
    default: Option<DefaultFn>,
}

impl std::fmt::Debug for SymbolData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolData")
            .field("aliases", &self.aliases)
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field("parent", &self.parent)
            .finish()
    }
}

impl SymbolData {
    pub(crate) fn new(aliases: Vec<String>, kind: SymbolKind, arity: Arity) -> Self {
        Self {
            aliases,
            kind,
            arity,
            parent: None,
            help: None,
            suggestions: Vec::default(),
            converter: None,
            default: None,
        }
    }

    pub(crate) fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub(crate) fn aliases_mut(&mut self) -> &mut Vec<String> {
        &mut self.aliases
    }

    pub(crate) fn kind(&self) -> &SymbolKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut SymbolKind {
        &mut self.kind
    }

    pub(crate) fn arity(&self) -> Arity {
        self.arity
    }

    pub(crate) fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: SymbolId) {
        self.parent = Some(parent);
    }

    pub(crate) fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub(crate) fn set_help(&mut self, help: String) {
        self.help.replace(help);
    }

    pub(crate) fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub(crate) fn suggestions_mut(&mut self) -> &mut Vec<String> {
        &mut self.suggestions
    }

    pub(crate) fn converter(&self) -> Option<&ConvertFn> {
        self.converter.as_ref()
    }

    pub(crate) fn set_converter(&mut self, converter: ConvertFn) {
        self.converter.replace(converter);
    }

    pub(crate) fn default_factory(&self) -> Option<&DefaultFn> {
        self.default.as_ref()
    }

    pub(crate) fn set_default_factory(&mut self, factory: DefaultFn) {
        self.default.replace(factory);
    }

    pub(crate) fn matches(&self, text: &str) -> bool {
        self.aliases.iter().any(|alias| alias == text)
    }

    /// The canonical display name: the longest alias, prefix-stripped.
    pub(crate) fn display_name(&self) -> &str {
        let longest = self
            .aliases
            .iter()
            .max_by_key(|alias| alias.len())
            .expect("internal error - a symbol's alias set must be non-empty");
        longest.trim_start_matches('-')
    }

    pub(crate) fn is_command(&self) -> bool {
        matches!(self.kind, SymbolKind::Command { .. })
    }

    pub(crate) fn is_option(&self) -> bool {
        matches!(self.kind, SymbolKind::Option { .. })
    }

    pub(crate) fn is_argument(&self) -> bool {
        matches!(self.kind, SymbolKind::Argument)
    }

    pub(crate) fn is_required(&self) -> bool {
        matches!(self.kind, SymbolKind::Option { required: true, .. })
    }

    pub(crate) fn is_global(&self) -> bool {
        matches!(self.kind, SymbolKind::Option { global: true, .. })
    }

    pub(crate) fn is_greedy(&self) -> bool {
        matches!(self.kind, SymbolKind::Option { greedy: true, .. })
    }

    /// A presence flag: an option whose arity maximum is zero.
    pub(crate) fn is_flag(&self) -> bool {
        self.is_option() && !self.arity.takes_values()
    }
}
