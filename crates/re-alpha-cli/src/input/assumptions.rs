use std::path::Path;

use re_alpha_core::assumptions::AssumptionOverrides;

use super::file::{read_text, resolve_path};

/// Load assumption overrides from a `.yaml`/`.yml` or JSON file.
/// Keys that are not assumptions are ignored.
pub fn read_overrides(path: &str) -> Result<AssumptionOverrides, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read_text(&canonical)?;
    parse_overrides(&canonical, &contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
}

fn parse_overrides(
    path: &Path,
    contents: &str,
) -> Result<AssumptionOverrides, Box<dyn std::error::Error>> {
    if is_yaml(path) {
        Ok(serde_yaml::from_str(contents)?)
    } else {
        Ok(AssumptionOverrides::from_json(contents)?)
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_yaml_overrides() {
        let o = parse_overrides(Path::new("deal.yaml"), "ltv: 0.6\nhold_period: 7\nnotes: ignored\n")
            .unwrap();
        assert_eq!(o.ltv, Some(Decimal::new(6, 1)));
        assert_eq!(o.hold_period, Some(7));
        assert_eq!(o.rent_growth, None);
    }

    #[test]
    fn test_json_overrides() {
        let o = parse_overrides(Path::new("deal.json"), r#"{"interest_rate": "0.07"}"#).unwrap();
        assert_eq!(o.interest_rate, Some(Decimal::new(7, 2)));
    }

    #[test]
    fn test_extension_detection() {
        assert!(is_yaml(Path::new("a/b.YML")));
        assert!(!is_yaml(Path::new("a/b.json")));
        assert!(!is_yaml(Path::new("noext")));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_overrides(Path::new("x.json"), "{ltv:").is_err());
    }
}
