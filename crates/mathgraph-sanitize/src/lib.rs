// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Sanitizer for human-written algebraic expressions.
//!
//! Turns text such as `2ab² + sin(x)π` into the canonical form the parser
//! accepts (`2*a*(b**2)+sin(x)*3.1415927`) and classifies every name it
//! contains. No graph is touched here.
//!
//! Steps, in order: whitespace strip, alphabet check, macro words,
//! superscripts, irrational symbols, segment scan with classification and
//! implicit multiplication.

mod constants;
mod error;
mod scan;
mod superscript;

pub use constants::{
    irrational, is_irrational, substitute_irrationals, substitute_macros, Irrational,
    IRRATIONALS, MACROS,
};
pub use error::{Result, SanitizeError};
pub use scan::{longest_function_suffix, split_composite, Classification};
pub use superscript::{is_superscript, rewrite_superscripts, superscript_digit};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Sanitizer switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeOptions {
    /// Single letters are variables and juxtaposition multiplies
    /// (`2ab` → `2*a*b`). Off: multi-letter identifiers are allowed.
    pub algebraic_notation: bool,
    /// Expand macro words (`Pi`, `eNum`, `Phi`, `Gold`).
    pub macros: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            algebraic_notation: true,
            macros: true,
        }
    }
}

/// A sanitized expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sanitized {
    /// Canonical text, parseable by `mathgraph-parser`.
    pub canonical: String,
    /// Names and literals found in `canonical`.
    pub classification: Classification,
}

fn is_authorized(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '_' | '.' | '+' | '-' | '*' | '/' | '%' | '(' | ')' | ',')
        || is_superscript(c)
        || is_irrational(c)
}

fn check_alphabet(text: &str) -> Result<()> {
    match text.chars().find(|c| !is_authorized(*c)) {
        Some(c) => Err(SanitizeError::UnauthorizedSymbol(c.to_string())),
        None => Ok(()),
    }
}

/// Sanitize `raw` into canonical form and classify its names.
#[instrument(skip_all, fields(len = raw.len()))]
pub fn sanitize(raw: &str, options: &SanitizeOptions) -> Result<Sanitized> {
    let mut text: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    loop {
        check_alphabet(&text)?;
        if !options.macros {
            break;
        }
        let (expanded, changed) = substitute_macros(&text);
        if !changed {
            break;
        }
        debug!(before = %text, after = %expanded, "macro words expanded");
        text = expanded.chars().filter(|c| !c.is_whitespace()).collect();
    }

    let text = rewrite_superscripts(&text, options.algebraic_notation)?;
    let text = substitute_irrationals(&text);
    let (canonical, classification) = scan::classify(&text, options.algebraic_notation)?;

    debug!(
        %canonical,
        variables = classification.variables.len(),
        constants = classification.constants.len(),
        functions = classification.functions.len(),
        "sanitized"
    );

    Ok(Sanitized {
        canonical,
        classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgraph_functions as _;

    fn algebraic(raw: &str) -> Result<String> {
        sanitize(raw, &SanitizeOptions::default()).map(|s| s.canonical)
    }

    #[test]
    fn test_whitespace_is_dropped() {
        assert_eq!(algebraic(" x +\t1 ").unwrap(), "x+1");
    }

    #[test]
    fn test_alphabet() {
        assert_eq!(
            algebraic("x$2"),
            Err(SanitizeError::UnauthorizedSymbol("$".into()))
        );
        assert_eq!(
            algebraic("x<y"),
            Err(SanitizeError::UnauthorizedSymbol("<".into()))
        );
    }

    #[test]
    fn test_macros_switch() {
        assert_eq!(algebraic("2Pi").unwrap(), "2*3.1415927");
        let off = SanitizeOptions {
            algebraic_notation: false,
            macros: false,
        };
        let sanitized = sanitize("Pi*2", &off).unwrap();
        assert_eq!(sanitized.canonical, "Pi*2");
        assert!(sanitized.classification.variables.contains("Pi"));
    }

    #[test]
    fn test_options_default_from_json() {
        let options: SanitizeOptions = serde_json::from_str(r#"{"macros": false}"#).unwrap();
        assert!(options.algebraic_notation);
        assert!(!options.macros);
    }
}
