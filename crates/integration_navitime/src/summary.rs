//! Itinerary summaries
//!
//! Turns a [`RouteResponse`] into [`ItineraryReport`] values. Rendering is
//! pure: the same response always produces byte-identical text.

use std::fmt;

use serde::Serialize;

use crate::client::RouteClient;
use crate::error::RouteError;
use crate::models::{Itinerary, RouteResponse, Section, clock_time};
use crate::query::RouteQuery;

/// Text rendered for a response without itineraries
pub const NO_ROUTES: &str = "No routes found";

/// Human-readable summary of one itinerary
///
/// Field order is fixed and matches the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryReport {
    /// 1-based position in the provider's ranking
    pub rank: usize,
    /// Origin label and coordinates
    pub origin: String,
    /// Destination label and coordinates
    pub destination: String,
    /// Departure clock time
    pub departure: String,
    /// Arrival clock time
    pub arrival: String,
    /// Total travel time
    pub total_time: String,
    /// Total distance
    pub total_distance: String,
    /// Number of transfers
    pub transfers: String,
    /// Total fare
    pub fare: String,
    /// One line per section, in travel order
    pub sections: Vec<String>,
}

impl ItineraryReport {
    /// Build the report for the itinerary at `rank` (1-based)
    #[must_use]
    pub fn from_itinerary(rank: usize, itinerary: &Itinerary) -> Self {
        Self {
            rank,
            origin: itinerary.origin.format_detail(),
            destination: itinerary.destination.format_detail(),
            departure: itinerary
                .departure_time
                .as_ref()
                .map(|time| clock_time(time))
                .to_string(),
            arrival: itinerary
                .arrival_time
                .as_ref()
                .map(|time| clock_time(time))
                .to_string(),
            total_time: itinerary.total_time_minutes.with_unit("min"),
            total_distance: itinerary.total_distance_meters.with_unit("m"),
            transfers: itinerary.transfer_count.to_string(),
            fare: itinerary.fare_amount.with_unit("JPY"),
            sections: itinerary
                .sections
                .iter()
                .map(Section::format_detail)
                .collect(),
        }
    }
}

impl fmt::Display for ItineraryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route {}", self.rank)?;
        writeln!(f, "  Origin: {}", self.origin)?;
        writeln!(f, "  Destination: {}", self.destination)?;
        writeln!(f, "  Departure: {}", self.departure)?;
        writeln!(f, "  Arrival: {}", self.arrival)?;
        writeln!(f, "  Total time: {}", self.total_time)?;
        writeln!(f, "  Total distance: {}", self.total_distance)?;
        writeln!(f, "  Transfers: {}", self.transfers)?;
        writeln!(f, "  Fare: {}", self.fare)?;

        if self.sections.is_empty() {
            return write!(f, "  Sections: none");
        }

        write!(f, "  Sections:")?;
        for (i, line) in self.sections.iter().enumerate() {
            write!(f, "\n    [{}] {line}", i + 1)?;
        }
        Ok(())
    }
}

/// Summarize every itinerary of a response, preserving provider order
#[must_use]
pub fn summarize(response: &RouteResponse) -> Vec<ItineraryReport> {
    response
        .itineraries
        .iter()
        .enumerate()
        .map(|(i, itinerary)| ItineraryReport::from_itinerary(i + 1, itinerary))
        .collect()
}

/// Render reports as text, separated by blank lines
#[must_use]
pub fn render(reports: &[ItineraryReport]) -> String {
    if reports.is_empty() {
        return NO_ROUTES.to_string();
    }

    reports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Execute a query and summarize the result
///
/// # Errors
///
/// Propagates any error from the client unchanged.
pub async fn search_and_summarize(
    client: &dyn RouteClient,
    query: &RouteQuery,
) -> Result<Vec<ItineraryReport>, RouteError> {
    let response = client.execute(query).await?;
    Ok(summarize(&response))
}
