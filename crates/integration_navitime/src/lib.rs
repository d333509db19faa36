//! Navitime transit route integration
//!
//! Searches multi-modal transit routes via the Navitime Route TotalNavi API
//! (<https://navitime-route-totalnavi.p.rapidapi.com>, served through RapidAPI)
//! and turns the result into deterministic, human-readable itinerary reports.
//!
//! # Architecture
//!
//! The pipeline has four stages, each consuming only the previous stage's output:
//!
//! 1. [`RouteQueryBuilder`] validates input and builds an immutable [`RouteQuery`];
//! 2. [`RouteClient`] (implemented by [`NavitimeRouteClient`]) performs one HTTP
//!    exchange and classifies failures into [`RouteError`];
//! 3. [`parse`] normalizes either of the two observed payload shapes into a
//!    [`RouteResponse`];
//! 4. [`summarize`] renders each [`Itinerary`] into an [`ItineraryReport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_navitime::{NavitimeConfig, NavitimeRouteClient, RouteClient, RouteQuery};
//!
//! let config = NavitimeConfig::with_api_key("my-rapidapi-key");
//! let client = NavitimeRouteClient::new(&config)?;
//!
//! let query = RouteQuery::builder()
//!     .origin(35.2746, 136.2522)      // Hikone
//!     .destination(35.3147, 136.2908) // Maibara
//!     .build()?;
//!
//! let response = client.execute(&query).await?;
//! println!("{}", integration_navitime::render(&integration_navitime::summarize(&response)));
//! ```

mod client;
mod config;
mod error;
mod models;
pub mod parser;
mod query;
mod summary;

pub use client::{API_HOST_HEADER, API_KEY_HEADER, ExchangeState, NavitimeRouteClient, RouteClient};
pub use config::NavitimeConfig;
pub use error::{RAW_BODY_SNIPPET_CHARS, RouteError};
pub use models::{Itinerary, Place, Reported, RouteResponse, Section, UNAVAILABLE};
pub use parser::{UNKNOWN_SECTION_TAG, parse, parse_value};
pub use query::{RouteQuery, RouteQueryBuilder, START_TIME_FORMAT};
pub use summary::{ItineraryReport, NO_ROUTES, render, search_and_summarize, summarize};

pub use domain::{Coordinate, CoordinateDatum, CoordinateUnit};
