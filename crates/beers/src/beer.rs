use core::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brewery_core::{BeerId, DomainError, DomainResult, Entity};

const MAX_NAME_LEN: usize = 100;

/// Beer style category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerStyle {
    Lager,
    Pilsner,
    Stout,
    Gose,
    Porter,
    Ale,
    Wheat,
    Ipa,
    PaleAle,
    Saison,
}

impl BeerStyle {
    pub const ALL: [BeerStyle; 10] = [
        BeerStyle::Lager,
        BeerStyle::Pilsner,
        BeerStyle::Stout,
        BeerStyle::Gose,
        BeerStyle::Porter,
        BeerStyle::Ale,
        BeerStyle::Wheat,
        BeerStyle::Ipa,
        BeerStyle::PaleAle,
        BeerStyle::Saison,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BeerStyle::Lager => "LAGER",
            BeerStyle::Pilsner => "PILSNER",
            BeerStyle::Stout => "STOUT",
            BeerStyle::Gose => "GOSE",
            BeerStyle::Porter => "PORTER",
            BeerStyle::Ale => "ALE",
            BeerStyle::Wheat => "WHEAT",
            BeerStyle::Ipa => "IPA",
            BeerStyle::PaleAle => "PALE_ALE",
            BeerStyle::Saison => "SAISON",
        }
    }
}

impl core::fmt::Display for BeerStyle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeerStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BeerStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown beer style: {s}")))
    }
}

/// Client-editable beer fields (create + update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerDraft {
    pub name: String,
    pub style: BeerStyle,
    pub upc: i64,
    pub price: BigDecimal,
    pub quantity_on_hand: i32,
}

impl BeerDraft {
    pub fn validate(&self) -> DomainResult<()> {
        DomainError::check_all(field_problems(
            Some(&self.name),
            Some(self.upc),
            Some(&self.price),
            self.quantity_on_hand,
        ))
    }
}

fn field_problems(
    name: Option<&str>,
    upc: Option<i64>,
    price: Option<&BigDecimal>,
    quantity_on_hand: i32,
) -> Vec<String> {
    let mut problems = Vec::new();

    match name.map(str::trim) {
        None | Some("") => problems.push("beerName must not be blank".to_string()),
        Some(n) if n.chars().count() > MAX_NAME_LEN => {
            problems.push(format!("beerName must be at most {MAX_NAME_LEN} characters"))
        }
        Some(_) => {}
    }

    match upc {
        None => problems.push("upc is required".to_string()),
        Some(u) if u <= 0 => problems.push("upc must be positive".to_string()),
        Some(_) => {}
    }

    match price {
        None => problems.push("price is required".to_string()),
        Some(p) if *p <= BigDecimal::from(0) => problems.push("price must be positive".to_string()),
        Some(_) => {}
    }

    if quantity_on_hand < 0 {
        problems.push("quantityOnHand must not be negative".to_string());
    }

    problems
}

/// Entity: Beer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    id: BeerId,
    version: u32,
    name: String,
    style: BeerStyle,
    upc: i64,
    price: BigDecimal,
    quantity_on_hand: i32,
    created_date: DateTime<Utc>,
    last_modified_date: DateTime<Utc>,
}

impl Beer {
    pub fn builder() -> BeerBuilder {
        BeerBuilder::default()
    }

    /// Create a brand-new beer from a draft (fresh id, version 0).
    pub fn create(draft: BeerDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        Self::builder()
            .beer_name(draft.name)
            .beer_style(draft.style)
            .upc(draft.upc)
            .price(draft.price)
            .quantity_on_hand(draft.quantity_on_hand)
            .created_date(now)
            .last_modified_date(now)
            .build()
    }

    /// Replace the editable fields. Identity and creation time are kept.
    pub fn update(&mut self, draft: BeerDraft, now: DateTime<Utc>) -> DomainResult<()> {
        draft.validate()?;

        self.name = draft.name.trim().to_string();
        self.style = draft.style;
        self.upc = draft.upc;
        self.price = draft.price;
        self.quantity_on_hand = draft.quantity_on_hand;
        self.last_modified_date = now;
        self.version += 1;
        Ok(())
    }

    pub fn id_typed(&self) -> BeerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> BeerStyle {
        self.style
    }

    pub fn upc(&self) -> i64 {
        self.upc
    }

    pub fn price(&self) -> &BigDecimal {
        &self.price
    }

    pub fn quantity_on_hand(&self) -> i32 {
        self.quantity_on_hand
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn last_modified_date(&self) -> DateTime<Utc> {
        self.last_modified_date
    }
}

impl Entity for Beer {
    type Id = BeerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u32 {
        self.version
    }
}

/// Fluent builder for [`Beer`].
///
/// `id`, `version` and the timestamps are optional: they default to a fresh
/// id, version 0 and the current time. Every other field is validated by
/// [`BeerBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct BeerBuilder {
    id: Option<BeerId>,
    version: Option<u32>,
    name: Option<String>,
    style: Option<BeerStyle>,
    upc: Option<i64>,
    price: Option<BigDecimal>,
    quantity_on_hand: Option<i32>,
    created_date: Option<DateTime<Utc>>,
    last_modified_date: Option<DateTime<Utc>>,
}

impl BeerBuilder {
    pub fn id(mut self, id: BeerId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn beer_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn beer_style(mut self, style: BeerStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn upc(mut self, upc: i64) -> Self {
        self.upc = Some(upc);
        self
    }

    pub fn price(mut self, price: BigDecimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity_on_hand(mut self, quantity_on_hand: i32) -> Self {
        self.quantity_on_hand = Some(quantity_on_hand);
        self
    }

    pub fn created_date(mut self, created_date: DateTime<Utc>) -> Self {
        self.created_date = Some(created_date);
        self
    }

    pub fn last_modified_date(mut self, last_modified_date: DateTime<Utc>) -> Self {
        self.last_modified_date = Some(last_modified_date);
        self
    }

    pub fn build(self) -> DomainResult<Beer> {
        let quantity_on_hand = self.quantity_on_hand.unwrap_or(0);
        let mut problems = field_problems(
            self.name.as_deref(),
            self.upc,
            self.price.as_ref(),
            quantity_on_hand,
        );
        if self.style.is_none() {
            problems.push("beerStyle is required".to_string());
        }
        DomainError::check_all(problems)?;

        let (Some(name), Some(style), Some(upc), Some(price)) =
            (self.name, self.style, self.upc, self.price)
        else {
            return Err(DomainError::invariant("validated beer fields missing"));
        };

        let created_date = self.created_date.unwrap_or_else(Utc::now);
        Ok(Beer {
            id: self.id.unwrap_or_default(),
            version: self.version.unwrap_or(0),
            name: name.trim().to_string(),
            style,
            upc,
            price,
            quantity_on_hand,
            created_date,
            last_modified_date: self.last_modified_date.unwrap_or(created_date),
        })
    }
}

/// Optional listing criteria; an empty filter matches every beer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeerFilter {
    pub name: Option<String>,
    pub style: Option<BeerStyle>,
}

impl BeerFilter {
    pub fn new(name: Option<String>, style: Option<BeerStyle>) -> Self {
        Self {
            name: name.filter(|n| !n.trim().is_empty()),
            style,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.style.is_none()
    }

    pub fn matches(&self, beer: &Beer) -> bool {
        let name_ok = self.name.as_deref().is_none_or(|n| beer.name() == n.trim());
        let style_ok = self.style.is_none_or(|s| beer.style() == s);
        name_ok && style_ok
    }
}
