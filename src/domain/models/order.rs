//! Raw upstream order shapes and the canonical order summary.
//!
//! Shopify orders reach us through the gateway in one of two shapes: the
//! flat REST shape (snake_case fields, decimal-string prices, plain line
//! item arrays) and the GraphQL shape (camelCase fields, money objects,
//! connection-paginated line items). Both are modeled explicitly so the
//! "which shape did we get" decision is made once, at decode time, instead
//! of being re-probed field by field downstream.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Marker keys that only appear in the GraphQL order shape.
const GRAPH_MARKERS: &[&str] = &[
    "totalPrice",
    "lineItems",
    "createdAt",
    "shippingAddress",
    "displayFinancialStatus",
];

/// Errors produced when a fetched record cannot be read as an order.
///
/// A shape error marks the record as invalid; it is excluded from the
/// batch rather than failing the cycle.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("order record is not a JSON object")]
    NotAnObject,

    #[error("order record does not match a known shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An upstream order identifier, numeric in the REST shape and an opaque
/// string (`gid://...`) in the GraphQL shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderIdent {
    Num(i64),
    Text(String),
}

impl fmt::Display for OrderIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A monetary amount that upstream may encode as a JSON number or a
/// decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Num(f64),
    Text(String),
}

impl Amount {
    /// Parse the amount into a float, `None` when the value is not a
    /// readable number.
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Num(n) => n.is_finite().then_some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

/// A raw order in one of the two known upstream shapes.
#[derive(Debug, Clone)]
pub enum RawOrder {
    Flat(FlatOrder),
    Graph(GraphOrder),
}

impl RawOrder {
    /// Decode a fetched record into one of the known shapes.
    ///
    /// Records carrying a snake_case `total_price` are always read as the
    /// flat shape; otherwise any camelCase marker key selects the GraphQL
    /// shape. This preserves the flat-field-first price resolution order.
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        let map = value.as_object().ok_or(ShapeError::NotAnObject)?;

        if !map.contains_key("total_price") && GRAPH_MARKERS.iter().any(|k| map.contains_key(*k))
        {
            Ok(Self::Graph(serde_json::from_value(value.clone())?))
        } else {
            Ok(Self::Flat(serde_json::from_value(value.clone())?))
        }
    }

    /// The stable upstream identifier, if the record carried one.
    pub fn ident(&self) -> Option<&OrderIdent> {
        match self {
            Self::Flat(o) => o.id.as_ref(),
            Self::Graph(o) => o.id.as_ref(),
        }
    }

    /// Resolve the order total to a number, or `None` when no price field
    /// is present or parseable.
    ///
    /// `None` is distinct from a legitimately free order; callers deciding
    /// whether to compare against a threshold must treat `None` as "skip",
    /// not as zero.
    pub fn resolved_total(&self) -> Option<f64> {
        match self {
            Self::Flat(o) => o
                .total_price
                .as_ref()
                .and_then(Amount::parse)
                .or_else(|| o.current_total_price.as_ref().and_then(Amount::parse)),
            Self::Graph(o) => o.total_price.as_ref().and_then(GraphMoney::amount),
        }
    }
}

impl<'de> Deserialize<'de> for RawOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Flat (REST-like) order shape, snake_case fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatOrder {
    #[serde(default)]
    pub id: Option<OrderIdent>,
    #[serde(default)]
    pub order_number: Option<OrderIdent>,
    #[serde(default)]
    pub total_price: Option<Amount>,
    #[serde(default)]
    pub current_total_price: Option<Amount>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer: Option<FlatCustomer>,
    #[serde(default)]
    pub line_items: Vec<FlatLineItem>,
    #[serde(default)]
    pub shipping_address: Option<FlatAddress>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub financial_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatCustomer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatLineItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<Amount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// GraphQL order shape, camelCase fields, connection-paginated line items.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphOrder {
    #[serde(default)]
    pub id: Option<OrderIdent>,
    /// Human-facing order name, e.g. `#1001`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_price: Option<GraphMoney>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer: Option<GraphCustomer>,
    #[serde(default)]
    pub line_items: Option<LineItemConnection>,
    #[serde(default)]
    pub shipping_address: Option<GraphAddress>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub display_financial_status: Option<String>,
}

/// GraphQL money value: either a bare decimal string or a
/// `{amount, currencyCode}` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GraphMoney {
    Text(String),
    Object {
        amount: Amount,
        #[serde(default, rename = "currencyCode")]
        currency_code: Option<String>,
    },
}

impl GraphMoney {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Text(s) => Amount::Text(s.clone()).parse(),
            Self::Object { amount, .. } => amount.parse(),
        }
    }

    pub fn currency_code(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Object { currency_code, .. } => currency_code.as_deref(),
        }
    }
}

/// GraphQL line item connection, either `edges[].node` or `nodes[]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LineItemConnection {
    Edges { edges: Vec<LineItemEdge> },
    Nodes { nodes: Vec<GraphLineItem> },
}

impl LineItemConnection {
    /// Flatten the connection into an ordered item list.
    pub fn items(&self) -> Vec<&GraphLineItem> {
        match self {
            Self::Edges { edges } => edges.iter().map(|e| &e.node).collect(),
            Self::Nodes { nodes } => nodes.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItemEdge {
    pub node: GraphLineItem,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphLineItem {
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<GraphMoney>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphCustomer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Canonical order projection used for filtering display and notification
/// formatting. Built once per raw order, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub order_id: Option<String>,
    pub order_number: String,
    pub total: f64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items_count: usize,
    pub top_items: Vec<TopItem>,
    pub shipping_address: String,
    pub created_at: String,
    pub created_at_display: String,
    pub financial_status: String,
}

/// One of the first few line items shown in the notification body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopItem {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}
