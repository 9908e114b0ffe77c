//! Common ISO 4217 currencies seeded into a fresh registry.

/// `(code, symbol, exponent)` for currencies known out of the box.
pub const BUILTIN_CURRENCIES: &[(&str, &str, u32)] = &[
    ("USD", "$", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("CAD", "C$", 2),
    ("AUD", "A$", 2),
    ("NZD", "NZ$", 2),
    ("CHF", "CHF", 2),
    ("SEK", "kr", 2),
    ("NOK", "kr", 2),
    ("DKK", "kr", 2),
    ("PLN", "zł", 2),
    ("CZK", "Kč", 2),
    ("MXN", "Mex$", 2),
    ("BRL", "R$", 2),
    ("CNY", "¥", 2),
    ("HKD", "HK$", 2),
    ("SGD", "S$", 2),
    ("INR", "₹", 2),
    ("ZAR", "R", 2),
    ("JPY", "¥", 0),
    ("KRW", "₩", 0),
    ("VND", "₫", 0),
    ("ISK", "kr", 0),
    ("BHD", "BD", 3),
    ("KWD", "KD", 3),
    ("OMR", "OMR", 3),
    ("TND", "DT", 3),
];
