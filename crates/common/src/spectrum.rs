//! Peak parsing and spectral math
//!
//! Peak lists are stored as space-separated "mz:intensity" text. Entropy
//! and entropy similarity follow the spectral-entropy literature: peak
//! intensities are normalized to a probability distribution, and the
//! similarity of two spectra compares the entropy of their 50/50 merge
//! against the individual entropies, scaled into [0, 1].

use crate::errors::{AppError, Result};
use regex_lite::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

/// Parse stored peak text. Empty input is an empty peak list; a malformed
/// token is a data integrity failure, not a client error.
pub fn parse_peaks(text: &str) -> Result<Vec<Peak>> {
    let mut peaks = Vec::new();
    for token in text.split_whitespace() {
        let (mz, intensity) = token.split_once(':').ok_or_else(|| AppError::Internal {
            message: format!("malformed peak token {:?}", token),
        })?;
        let mz: f64 = mz.parse().map_err(|_| AppError::Internal {
            message: format!("malformed peak m/z {:?}", token),
        })?;
        let intensity: f64 = intensity.parse().map_err(|_| AppError::Internal {
            message: format!("malformed peak intensity {:?}", token),
        })?;
        peaks.push(Peak { mz, intensity });
    }
    Ok(peaks)
}

fn normalize(peaks: &[Peak]) -> Vec<Peak> {
    let total: f64 = peaks.iter().map(|p| p.intensity).filter(|i| *i > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    peaks
        .iter()
        .filter(|p| p.intensity > 0.0)
        .map(|p| Peak {
            mz: p.mz,
            intensity: p.intensity / total,
        })
        .collect()
}

/// Shannon entropy of the intensity distribution, in nats.
pub fn spectral_entropy(peaks: &[Peak]) -> f64 {
    normalize(peaks)
        .iter()
        .map(|p| -p.intensity * p.intensity.ln())
        .sum()
}

/// Merge two normalized spectra at half weight each, combining peaks whose
/// m/z values fall within the tolerance.
fn merge(a: &[Peak], b: &[Peak], tolerance: f64) -> Vec<Peak> {
    let mut all: Vec<Peak> = a
        .iter()
        .chain(b.iter())
        .map(|p| Peak {
            mz: p.mz,
            intensity: p.intensity / 2.0,
        })
        .collect();
    all.sort_by(|x, y| x.mz.total_cmp(&y.mz));

    let mut merged: Vec<Peak> = Vec::with_capacity(all.len());
    for peak in all {
        match merged.last_mut() {
            Some(last) if (peak.mz - last.mz).abs() <= tolerance => {
                // Intensity-weighted centroid of the combined peak
                let total = last.intensity + peak.intensity;
                last.mz = (last.mz * last.intensity + peak.mz * peak.intensity) / total;
                last.intensity = total;
            }
            _ => merged.push(peak),
        }
    }
    merged
}

/// Entropy similarity of two spectra in [0, 1]; 1 means identical peak
/// distributions, 0 means fully disjoint.
pub fn entropy_similarity(a: &[Peak], b: &[Peak], tolerance: f64) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let s_a = spectral_entropy(&a);
    let s_b = spectral_entropy(&b);
    let s_ab = spectral_entropy(&merge(&a, &b, tolerance));

    let similarity = 1.0 - (2.0 * s_ab - s_a - s_b) / 4.0_f64.ln();
    similarity.clamp(0.0, 1.0)
}

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{4})-[0-9]{1,2}-[0-9]{1,2}").unwrap())
}

fn us_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/([0-9]{4})$").unwrap())
}

fn bare_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^((?:19|20)[0-9]{2})$").unwrap())
}

/// Extract a publication year from the assorted date formats the upstream
/// sources use. Unparseable input reads as no year.
pub fn clean_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let captured = bare_year_re()
        .captures(raw)
        .or_else(|| iso_date_re().captures(raw))
        .or_else(|| us_date_re().captures(raw));
    match captured {
        Some(caps) => caps[1].parse().ok(),
        None => {
            if !raw.is_empty() {
                warn!(value = raw, "unparseable publication date");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn parses_peak_text() {
        let peaks = parse_peaks("100.5:20 212.9:999.1").unwrap();
        assert_eq!(peaks.len(), 2);
        assert!((peaks[0].mz - 100.5).abs() < EPS);
        assert!((peaks[1].intensity - 999.1).abs() < EPS);
        assert!(parse_peaks("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_peak_tokens() {
        assert!(parse_peaks("100.5").is_err());
        assert!(parse_peaks("abc:10").is_err());
        assert!(parse_peaks("100.5:").is_err());
    }

    #[test]
    fn entropy_of_two_equal_peaks_is_ln2() {
        let peaks = [
            Peak { mz: 100.0, intensity: 50.0 },
            Peak { mz: 200.0, intensity: 50.0 },
        ];
        assert!((spectral_entropy(&peaks) - 2.0_f64.ln()).abs() < EPS);
    }

    #[test]
    fn entropy_of_single_peak_is_zero() {
        let peaks = [Peak { mz: 100.0, intensity: 999.0 }];
        assert!(spectral_entropy(&peaks).abs() < EPS);
    }

    #[test]
    fn identical_spectra_have_similarity_one() {
        let peaks = [
            Peak { mz: 100.0, intensity: 30.0 },
            Peak { mz: 150.0, intensity: 60.0 },
            Peak { mz: 212.0, intensity: 10.0 },
        ];
        assert!((entropy_similarity(&peaks, &peaks, 0.05) - 1.0).abs() < EPS);
    }

    #[test]
    fn disjoint_spectra_have_similarity_zero() {
        let a = [
            Peak { mz: 100.0, intensity: 50.0 },
            Peak { mz: 110.0, intensity: 50.0 },
        ];
        let b = [
            Peak { mz: 300.0, intensity: 50.0 },
            Peak { mz: 310.0, intensity: 50.0 },
        ];
        assert!(entropy_similarity(&a, &b, 0.05).abs() < EPS);
    }

    #[test]
    fn empty_spectrum_has_no_similarity() {
        let a = [Peak { mz: 100.0, intensity: 50.0 }];
        assert_eq!(entropy_similarity(&a, &[], 0.05), 0.0);
    }

    #[test]
    fn year_extraction_handles_source_formats() {
        assert_eq!(clean_year("2019"), Some(2019));
        assert_eq!(clean_year("2019-04-30"), Some(2019));
        assert_eq!(clean_year("4/30/2019"), Some(2019));
        assert_eq!(clean_year(" 2003 "), Some(2003));
        assert_eq!(clean_year("circa 1890"), None);
        assert_eq!(clean_year(""), None);
    }
}
