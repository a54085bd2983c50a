//! Unit-string parser.
//!
//! Grammar, informally:
//!
//! ```text
//! unit        := numerator [ "/" denominator ]
//! numerator   := "1" | tokens
//! denominator := tokens
//! tokens      := token { "-" token }
//! token       := name [ "^" number | digits ]
//! ```
//!
//! Grouping punctuation and whitespace are ignored.  A `-` directly after
//! `^` is the sign of the exponent, not a separator.  Every denominator
//! token has its power negated.

use log::trace;
use mt_core::{Error, Real, Result};

use crate::dimension::{BaseDimension, Dimension};
use crate::table::UnitTable;

/// A parsed unit string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUnit {
    text: String,
    dimension: Dimension,
    scale: Real,
    offset: Option<Real>,
}

impl ParsedUnit {
    /// The dimensionless unit.
    pub fn dimensionless() -> Self {
        Self {
            text: "-".to_string(),
            dimension: Dimension::DIMENSIONLESS,
            scale: 1.0,
            offset: None,
        }
    }

    /// The string this unit was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Combined exponent vector.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Combined multiplicative factor to base SI.
    pub fn scale(&self) -> Real {
        self.scale
    }

    /// Additive offset to base SI; only a lone affine unit keeps one.
    pub fn offset(&self) -> Option<Real> {
        self.offset
    }

    /// `true` if the unit converts with an offset.
    pub fn is_affine(&self) -> bool {
        self.offset.is_some()
    }
}

/// Parse `text` against the standard table.
pub fn parse_unit(text: &str) -> Result<ParsedUnit> {
    UnitTable::standard().parse(text)
}

impl UnitTable {
    /// Parse a unit string into its exponent vector and conversion factor.
    pub fn parse(&self, text: &str) -> Result<ParsedUnit> {
        let cleaned: String = text
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | '[' | ']' | '{' | '}') && !c.is_whitespace())
            .collect();

        if cleaned.is_empty() || cleaned == "-" || cleaned == "1" {
            return Ok(ParsedUnit {
                text: text.to_string(),
                ..ParsedUnit::dimensionless()
            });
        }

        let sides: Vec<&str> = cleaned.split('/').collect();
        let (numerator, denominator) = match sides.as_slice() {
            [num] => (*num, None),
            [num, den] => (*num, Some(*den)),
            _ => return Err(Error::MalformedUnit(text.to_string())),
        };
        if numerator.is_empty() || denominator == Some("") {
            return Err(Error::MalformedUnit(text.to_string()));
        }

        let mut dimension = Dimension::DIMENSIONLESS;
        let mut scale = 1.0;
        let mut affine = Vec::new();

        let numerator = if numerator == "1" { "" } else { numerator };
        for (side, sign) in [(numerator, 1.0), (denominator.unwrap_or(""), -1.0)] {
            if side.is_empty() {
                continue;
            }
            for token in split_tokens(side, text)? {
                let (name, power) = split_power(token, text)?;
                let power = power * sign;
                let entry = self
                    .get(name)
                    .ok_or_else(|| Error::UnknownUnit(name.to_string()))?;
                dimension = dimension * entry.dimension.powf(power);
                scale *= entry.scale.powf(power);
                if let Some(offset) = entry.offset {
                    affine.push((offset, power));
                }
            }
        }

        // An offset only makes sense for a lone absolute temperature.
        let offset = match affine.as_slice() {
            [(offset, power)]
                if *power == 1.0 && dimension == Dimension::base(BaseDimension::Temperature) =>
            {
                Some(*offset)
            }
            [] => None,
            _ => {
                trace!("'{text}': affine unit used in a compound, offset dropped");
                None
            }
        };

        trace!("parsed '{text}' as [{dimension}] x {scale}");
        Ok(ParsedUnit {
            text: text.to_string(),
            dimension,
            scale,
            offset,
        })
    }
}

/// Split one side on `-`, except where the `-` is an exponent sign.
fn split_tokens<'a>(side: &'a str, text: &str) -> Result<Vec<&'a str>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut previous = None;
    for (i, c) in side.char_indices() {
        if c == '-' && previous != Some('^') {
            tokens.push(&side[start..i]);
            start = i + 1;
        }
        previous = Some(c);
    }
    tokens.push(&side[start..]);
    if tokens.iter().any(|t| t.is_empty()) {
        return Err(Error::MalformedUnit(text.to_string()));
    }
    Ok(tokens)
}

/// Separate a token into its unit name and power (explicit `^p` or
/// trailing digits; default 1).
fn split_power<'a>(token: &'a str, text: &str) -> Result<(&'a str, Real)> {
    let (name, power) = if let Some((name, power)) = token.split_once('^') {
        if power.is_empty() {
            return Err(Error::MalformedUnit(text.to_string()));
        }
        let power = power
            .parse::<Real>()
            .map_err(|_| Error::InvalidExponent(token.to_string()))?;
        (name, power)
    } else {
        let digits = token
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i);
        match digits {
            Some(i) => {
                let power = token[i..]
                    .parse::<Real>()
                    .map_err(|_| Error::InvalidExponent(token.to_string()))?;
                (&token[..i], power)
            }
            None => (token, 1.0),
        }
    };
    if name.is_empty() {
        return Err(Error::MalformedUnit(text.to_string()));
    }
    Ok((name, power))
}
