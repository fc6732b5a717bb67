//! # Corridor/Currency Catalog
//!
//! Canonical ISO country and currency lookup tables.
//!
//! The catalog is built once from static tables and is immutable
//! afterwards; no I/O happens after load. It answers the validity and
//! default-currency questions the coordinator and adapters ask, plus the
//! currency-scale question the normalizer asks.

use crate::domain::value_objects::{CountryCode, CurrencyCode};
use std::collections::HashMap;

/// A country known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// ISO-3166-1 alpha-2 code.
    pub iso2: CountryCode,
    /// ISO-3166-1 alpha-3 code.
    pub iso3: &'static str,
    /// English short name, uppercase.
    pub name: &'static str,
    /// Default remittance payout currency.
    pub default_currency: CurrencyCode,
}

/// Static country table: (alpha-2, alpha-3, name, default currency).
const COUNTRY_TABLE: &[(&str, &str, &str, &str)] = &[
    ("US", "USA", "UNITED STATES OF AMERICA", "USD"),
    ("GB", "GBR", "UNITED KINGDOM", "GBP"),
    ("CA", "CAN", "CANADA", "CAD"),
    ("AU", "AUS", "AUSTRALIA", "AUD"),
    ("NZ", "NZL", "NEW ZEALAND", "NZD"),
    ("DE", "DEU", "GERMANY", "EUR"),
    ("FR", "FRA", "FRANCE", "EUR"),
    ("ES", "ESP", "SPAIN", "EUR"),
    ("IT", "ITA", "ITALY", "EUR"),
    ("IE", "IRL", "IRELAND", "EUR"),
    ("PT", "PRT", "PORTUGAL", "EUR"),
    ("NL", "NLD", "NETHERLANDS", "EUR"),
    ("BE", "BEL", "BELGIUM", "EUR"),
    ("AT", "AUT", "AUSTRIA", "EUR"),
    ("PL", "POL", "POLAND", "PLN"),
    ("RO", "ROU", "ROMANIA", "RON"),
    ("UA", "UKR", "UKRAINE", "UAH"),
    ("TR", "TUR", "TURKEY", "TRY"),
    ("SG", "SGP", "SINGAPORE", "SGD"),
    ("MY", "MYS", "MALAYSIA", "MYR"),
    ("ID", "IDN", "INDONESIA", "IDR"),
    ("TH", "THA", "THAILAND", "THB"),
    ("VN", "VNM", "VIETNAM", "VND"),
    ("JP", "JPN", "JAPAN", "JPY"),
    ("KR", "KOR", "SOUTH KOREA", "KRW"),
    ("CN", "CHN", "CHINA", "CNY"),
    ("IN", "IND", "INDIA", "INR"),
    ("PK", "PAK", "PAKISTAN", "PKR"),
    ("BD", "BGD", "BANGLADESH", "BDT"),
    ("LK", "LKA", "SRI LANKA", "LKR"),
    ("NP", "NPL", "NEPAL", "NPR"),
    ("PH", "PHL", "PHILIPPINES", "PHP"),
    ("AE", "ARE", "UNITED ARAB EMIRATES", "AED"),
    ("SA", "SAU", "SAUDI ARABIA", "SAR"),
    ("QA", "QAT", "QATAR", "QAR"),
    ("KW", "KWT", "KUWAIT", "KWD"),
    ("BH", "BHR", "BAHRAIN", "BHD"),
    ("OM", "OMN", "OMAN", "OMR"),
    ("JO", "JOR", "JORDAN", "JOD"),
    ("LB", "LBN", "LEBANON", "LBP"),
    ("IQ", "IRQ", "IRAQ", "IQD"),
    ("YE", "YEM", "YEMEN", "YER"),
    ("EG", "EGY", "EGYPT", "EGP"),
    ("MA", "MAR", "MOROCCO", "MAD"),
    ("TN", "TUN", "TUNISIA", "TND"),
    ("DZ", "DZA", "ALGERIA", "DZD"),
    ("SD", "SDN", "SUDAN", "SDG"),
    ("KE", "KEN", "KENYA", "KES"),
    ("UG", "UGA", "UGANDA", "UGX"),
    ("TZ", "TZA", "TANZANIA", "TZS"),
    ("ET", "ETH", "ETHIOPIA", "ETB"),
    ("SO", "SOM", "SOMALIA", "SOS"),
    ("RW", "RWA", "RWANDA", "RWF"),
    ("NG", "NGA", "NIGERIA", "NGN"),
    ("GH", "GHA", "GHANA", "GHS"),
    ("ZA", "ZAF", "SOUTH AFRICA", "ZAR"),
    ("ZW", "ZWE", "ZIMBABWE", "USD"),
    ("MX", "MEX", "MEXICO", "MXN"),
    ("GT", "GTM", "GUATEMALA", "GTQ"),
    ("BR", "BRA", "BRAZIL", "BRL"),
    ("AR", "ARG", "ARGENTINA", "ARS"),
    ("CL", "CHL", "CHILE", "CLP"),
    ("CO", "COL", "COLOMBIA", "COP"),
    ("PE", "PER", "PERU", "PEN"),
    ("VE", "VEN", "VENEZUELA", "VES"),
];

/// Currencies accepted beyond country defaults (multi-country or
/// settlement-only codes).
const EXTRA_CURRENCIES: &[&str] = &["EUR", "USD", "GBP", "CHF", "SEK", "NOK", "DKK", "HKD"];

/// ISO-4217 currencies with zero-decimal minor units relevant to the
/// supported corridors.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "KRW", "VND", "IDR"];

/// Immutable ISO country/currency lookup tables.
///
/// Built once at startup; `reload` constructs a fresh instance so the
/// composition root can swap it and fire cache invalidation.
#[derive(Debug)]
pub struct Catalog {
    countries: HashMap<CountryCode, Country>,
    by_alpha3: HashMap<&'static str, CountryCode>,
    by_currency: HashMap<CurrencyCode, Vec<CountryCode>>,
    currencies: HashMap<CurrencyCode, u32>,
}

impl Catalog {
    /// Builds the catalog from the static tables.
    #[must_use]
    pub fn new() -> Self {
        let mut countries = HashMap::new();
        let mut by_alpha3 = HashMap::new();
        let mut by_currency: HashMap<CurrencyCode, Vec<CountryCode>> = HashMap::new();
        let mut currencies = HashMap::new();

        for (iso2, iso3, name, currency) in COUNTRY_TABLE {
            let Ok(code) = CountryCode::parse(iso2) else {
                continue;
            };
            let Ok(ccy) = CurrencyCode::parse(currency) else {
                continue;
            };
            countries.insert(
                code,
                Country {
                    iso2: code,
                    iso3,
                    name,
                    default_currency: ccy,
                },
            );
            by_alpha3.insert(*iso3, code);
            by_currency.entry(ccy).or_default().push(code);
            currencies.entry(ccy).or_insert(2);
        }

        for extra in EXTRA_CURRENCIES {
            if let Ok(ccy) = CurrencyCode::parse(extra) {
                currencies.entry(ccy).or_insert(2);
            }
        }

        for zero in ZERO_DECIMAL_CURRENCIES {
            if let Ok(ccy) = CurrencyCode::parse(zero) {
                currencies.insert(ccy, 0);
            }
        }

        Self {
            countries,
            by_alpha3,
            by_currency,
            currencies,
        }
    }

    /// Rebuilds the catalog from the static tables.
    ///
    /// The caller is responsible for firing the cache-invalidation hook
    /// after swapping the instance in.
    #[must_use]
    pub fn reload() -> Self {
        Self::new()
    }

    /// Returns the default payout currency for a country.
    #[must_use]
    pub fn default_currency(&self, country: CountryCode) -> Option<CurrencyCode> {
        self.countries.get(&country).map(|c| c.default_currency)
    }

    /// Returns all countries whose default currency is `currency`.
    ///
    /// Empty when the currency is unknown or settlement-only.
    #[must_use]
    pub fn country_for_currency(&self, currency: CurrencyCode) -> &[CountryCode] {
        self.by_currency
            .get(&currency)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns true if the code names a country in the ISO table.
    #[must_use]
    pub fn is_valid_iso_country(&self, country: CountryCode) -> bool {
        self.countries.contains_key(&country)
    }

    /// Returns true if the code names a currency in the ISO table.
    #[must_use]
    pub fn is_valid_iso_currency(&self, currency: CurrencyCode) -> bool {
        self.currencies.contains_key(&currency)
    }

    /// Resolves an alpha-3 country code to its alpha-2 form.
    #[must_use]
    pub fn alpha3_to_alpha2(&self, alpha3: &str) -> Option<CountryCode> {
        let upper = alpha3.trim().to_ascii_uppercase();
        self.by_alpha3.get(upper.as_str()).copied()
    }

    /// Returns the full country record.
    #[must_use]
    pub fn country(&self, code: CountryCode) -> Option<&Country> {
        self.countries.get(&code)
    }

    /// Returns the number of minor-unit decimals for amounts in
    /// `currency`. Unknown currencies default to two.
    #[must_use]
    pub fn currency_decimals(&self, currency: CurrencyCode) -> u32 {
        self.currencies.get(&currency).copied().unwrap_or(2)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
