const NUMERALS: [(u64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Roman numeral for `n`, composed greedily so there is no upper bound on
/// the representable value (thousands repeat `M`). Zero renders as `"I"`,
/// the first sub-tier.
pub fn roman(n: u64) -> String {
    if n == 0 {
        return "I".to_string();
    }
    let mut rest = n;
    let mut out = String::new();
    for (value, symbol) in NUMERALS {
        while rest >= value {
            out.push_str(symbol);
            rest -= value;
        }
    }
    out
}
