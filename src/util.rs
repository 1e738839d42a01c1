//! Display helpers shared by the engine and the renderer. None of these
//! change stored values; they only shape how amounts and names are shown.

/// Names longer than this are shortened on chart axes.
pub const MAX_LABEL_CHARS: usize = 12;

/// Characters kept from a shortened label before the `..` marker.
const TRUNCATED_LABEL_KEEP: usize = 10;

const COMPACT_SUFFIXES: [(f64, &str); 4] = [(1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Compact USD with at most one fractional digit.
///
/// Example: 450_000_000 → "$450M", 1_685_000_000 → "$1.7B", 999 → "$999"
pub fn format_currency(value: u64) -> String {
    let amount = value as f64;
    if amount < COMPACT_SUFFIXES[0].0 {
        return format!("${}", value);
    }

    let mut idx = COMPACT_SUFFIXES
        .iter()
        .rposition(|(divisor, _)| amount >= *divisor)
        .unwrap_or(0);
    let mut scaled = round_one_decimal(amount / COMPACT_SUFFIXES[idx].0);

    // 999_960 rounds to 1000K; show it as 1M instead.
    if scaled >= 1000.0 && idx + 1 < COMPACT_SUFFIXES.len() {
        idx += 1;
        scaled = round_one_decimal(amount / COMPACT_SUFFIXES[idx].0);
    }

    format!("${}{}", trim_decimal(scaled), COMPACT_SUFFIXES[idx].1)
}

/// Bar-chart axis tick: the amount in millions, e.g. "$450M", "$0.5M".
pub fn format_axis_millions(value: u64) -> String {
    format!("${}M", value as f64 / 1e6)
}

/// Shorten a project name for a chart axis.
///
/// Example: "DeepSpace Comms Relay" → "DeepSpace .."
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_CHARS {
        let head: String = name.chars().take(TRUNCATED_LABEL_KEEP).collect();
        format!("{}..", head)
    } else {
        name.to_string()
    }
}

/// `part / whole × 100`, or 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn trim_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
