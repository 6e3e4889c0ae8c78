//! What a handler hands to the presentation layer: a page to render with its
//! data, a redirect, or nothing, each carrying the flash notifications raised
//! while handling the request.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub severity: Severity,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Render {
        template: &'static str,
        data: serde_json::Value,
        flashes: Vec<Flash>,
    },
    Redirect {
        to: String,
        flashes: Vec<Flash>,
    },
    Empty {
        flashes: Vec<Flash>,
    },
}

impl Outcome {
    pub fn render<T: Serialize>(template: &'static str, data: &T) -> Result<Self> {
        Ok(Self::Render {
            template,
            data: serde_json::to_value(data)?,
            flashes: Vec::new(),
        })
    }

    /// The landing page, also shown when a submission fails.
    pub fn home() -> Self {
        Self::Render {
            template: "pages/home",
            data: json!({}),
            flashes: Vec::new(),
        }
    }

    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            flashes: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::Empty {
            flashes: Vec::new(),
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        match &mut self {
            Self::Render { flashes, .. } | Self::Redirect { flashes, .. } | Self::Empty { flashes } => {
                flashes.push(flash)
            }
        }
        self
    }

    pub fn flashes(&self) -> &[Flash] {
        match self {
            Self::Render { flashes, .. } | Self::Redirect { flashes, .. } | Self::Empty { flashes } => {
                flashes
            }
        }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::Render {
                template,
                data,
                flashes,
            } => Json(json!({
                "template": template,
                "flashes": flashes,
                "data": data,
            }))
            .into_response(),
            Self::Redirect { to, flashes } => (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, to.clone())],
                Json(json!({
                    "redirect": to,
                    "flashes": flashes,
                })),
            )
                .into_response(),
            Self::Empty { flashes } => Json(json!({ "flashes": flashes })).into_response(),
        }
    }
}
