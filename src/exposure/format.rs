//! Display formatting for exposure parameters.

/// `f/8`, `f/5.6`, `f/1.4`
pub fn format_aperture(aperture: f64) -> String {
    format!("f/{}", trim_number(aperture, 1))
}

/// Photographic shutter notation: `1/250s`, `0.5s` → `1/2s`, `8s`, `2m 30s`, `1h 30m`.
pub fn format_shutter(seconds: f64) -> String {
    if seconds >= 3600.0 {
        let total = seconds.round() as u64;
        let (h, m) = (total / 3600, (total % 3600) / 60);
        if m == 0 {
            format!("{h}h")
        } else {
            format!("{h}h {m}m")
        }
    } else if seconds >= 60.0 {
        let total = seconds.round() as u64;
        let (m, s) = (total / 60, total % 60);
        if s == 0 {
            format!("{m}m")
        } else {
            format!("{m}m {s}s")
        }
    } else if seconds >= 1.0 {
        format!("{}s", trim_number(seconds, 1))
    } else {
        format!("1/{}s", (1.0 / seconds).round() as u64)
    }
}

/// Parse `1/250`, `1/250s`, `0.5`, `30s`, `2m`, `1h` into seconds.
pub fn parse_shutter(text: &str) -> anyhow::Result<f64> {
    let text = text.trim();
    let invalid = || anyhow::anyhow!("Invalid shutter speed '{text}' (examples: 1/250, 0.5, 30s, 2m)");

    let (number, scale) = if let Some(n) = text.strip_suffix('h') {
        (n, 3600.0)
    } else if let Some(n) = text.strip_suffix('m') {
        (n, 60.0)
    } else {
        (text.strip_suffix('s').unwrap_or(text), 1.0)
    };

    let seconds = match number.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| invalid())?;
            let den: f64 = den.trim().parse().map_err(|_| invalid())?;
            num / den
        }
        None => number.trim().parse::<f64>().map_err(|_| invalid())?,
    } * scale;

    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(invalid());
    }
    Ok(seconds)
}

/// Parse `f/5.6`, `F8` or `5.6`.
pub fn parse_aperture(text: &str) -> anyhow::Result<f64> {
    let trimmed = text.trim();
    let number = trimmed
        .strip_prefix("f/")
        .or_else(|| trimmed.strip_prefix("F/"))
        .or_else(|| trimmed.strip_prefix('f'))
        .or_else(|| trimmed.strip_prefix('F'))
        .unwrap_or(trimmed);
    let value: f64 = number
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid aperture '{text}' (examples: f/5.6, 8)"))?;
    if !(value.is_finite() && value > 0.0) {
        anyhow::bail!("Aperture must be positive (got {text})");
    }
    Ok(value)
}

fn trim_number(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_shutter() {
        assert_eq!(format_shutter(1.0 / 8000.0), "1/8000s");
        assert_eq!(format_shutter(1.0 / 3.0), "1/3s");
        assert_eq!(format_shutter(0.5), "1/2s");
        assert_eq!(format_shutter(1.0), "1s");
        assert_eq!(format_shutter(2.5), "2.5s");
        assert_eq!(format_shutter(30.0), "30s");
        assert_eq!(format_shutter(60.0), "1m");
        assert_eq!(format_shutter(150.0), "2m 30s");
        assert_eq!(format_shutter(5400.0), "1h 30m");
        assert_eq!(format_shutter(86400.0), "24h");
    }

    #[test]
    fn test_format_aperture() {
        assert_eq!(format_aperture(8.0), "f/8");
        assert_eq!(format_aperture(5.6), "f/5.6");
        assert_eq!(format_aperture(1.0), "f/1");
        assert_eq!(format_aperture(22.0), "f/22");
    }

    #[test]
    fn test_parse_shutter() {
        assert_eq!(parse_shutter("1/250").unwrap(), 1.0 / 250.0);
        assert_eq!(parse_shutter("1/250s").unwrap(), 1.0 / 250.0);
        assert_eq!(parse_shutter("0.5").unwrap(), 0.5);
        assert_eq!(parse_shutter("30s").unwrap(), 30.0);
        assert_eq!(parse_shutter("2m").unwrap(), 120.0);
        assert_eq!(parse_shutter("1h").unwrap(), 3600.0);
        assert!(parse_shutter("fast").is_err());
        assert!(parse_shutter("0").is_err());
        assert!(parse_shutter("1/0").is_err());
    }

    #[test]
    fn test_parse_aperture() {
        assert_eq!(parse_aperture("f/5.6").unwrap(), 5.6);
        assert_eq!(parse_aperture("F8").unwrap(), 8.0);
        assert_eq!(parse_aperture("11").unwrap(), 11.0);
        assert!(parse_aperture("f/").is_err());
        assert!(parse_aperture("-2").is_err());
    }
}
