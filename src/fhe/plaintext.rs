//! Post-processing of decrypted CKKS plaintexts.
//!
//! Coefficients are read from the engine's textual plaintext rendering
//! because packed-value accessors are not reliable across engine builds.
//! The rendering is `(v0, v1, ..., vn, ... ); <precision note>`; only the
//! first `count` values are meaningful, later slots may be truncation noise.

use super::FheError;

/// Extracts the first `count` real coefficients from a textual plaintext.
pub fn parse_coefficients(text: &str, count: usize) -> Result<Vec<f64>, FheError> {
    if count == 0 {
        return Err(FheError::InvalidCoefficientCount(count));
    }

    let open = text
        .find('(')
        .ok_or_else(|| FheError::MalformedPlaintext("missing '('".into()))?;
    let close = text[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| FheError::MalformedPlaintext("missing ')'".into()))?;

    let values = text[open + 1..close]
        .split(',')
        .take(count)
        .map(|field| {
            let field = field.trim();
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| FheError::MalformedPlaintext(format!("bad coefficient '{}'", field)))
        })
        .collect::<Result<Vec<f64>, FheError>>()?;

    if values.len() < count {
        return Err(FheError::MalformedPlaintext(format!(
            "expected {} coefficients, found {}",
            count,
            values.len()
        )));
    }
    Ok(values)
}

/// Numerically stable softmax: `exp(v_i - max) / sum_j exp(v_j - max)`.
///
/// Invariant under a uniform shift of all inputs, so no ranking or relative
/// information beyond what the inputs carry is introduced.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
