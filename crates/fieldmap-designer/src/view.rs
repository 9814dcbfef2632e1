//! Map view and initial positioning from a farm record.

use async_trait::async_trait;
use fieldmap_core::{LatLng, LookupError, Notice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query string parameter carrying the farm id
pub const FARM_QUERY_PARAM: &str = "fazenda";

/// Center and zoom of the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

/// Where the view starts and how close it zooms on a located farm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewDefaults {
    pub fallback_center: LatLng,
    pub fallback_zoom: u8,
    pub located_zoom: u8,
}

impl ViewDefaults {
    pub fn fallback_view(&self) -> MapView {
        MapView {
            center: self.fallback_center,
            zoom: self.fallback_zoom,
        }
    }

    pub fn located_view(&self, center: LatLng) -> MapView {
        MapView {
            center,
            zoom: self.located_zoom,
        }
    }
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            fallback_center: LatLng::new(-23.5, -46.6),
            fallback_zoom: 17,
            located_zoom: 18,
        }
    }
}

/// Extracts the farm id from a URL query string (with or without `?`).
///
/// Keys and values are form-decoded, so `%2D` and `+` arrive as `-` and a
/// space.
pub fn farm_id_from_query(query: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == FARM_QUERY_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Looks up a farm's coordinates
#[async_trait]
pub trait FarmLocator: Send + Sync {
    async fn locate(&self, farm_id: &str) -> Result<LatLng, LookupError>;
}

/// In-memory farm table
#[derive(Debug, Clone, Default)]
pub struct StaticFarmLocator {
    farms: HashMap<String, Option<LatLng>>,
}

impl StaticFarmLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_farm(mut self, farm_id: impl Into<String>, location: Option<LatLng>) -> Self {
        self.farms.insert(farm_id.into(), location);
        self
    }
}

#[async_trait]
impl FarmLocator for StaticFarmLocator {
    async fn locate(&self, farm_id: &str) -> Result<LatLng, LookupError> {
        match self.farms.get(farm_id) {
            None => Err(LookupError::NotFound {
                farm_id: farm_id.to_string(),
            }),
            Some(None) => Err(LookupError::MissingLocation {
                farm_id: farm_id.to_string(),
            }),
            Some(Some(location)) => Ok(*location),
        }
    }
}

/// Result of initial view resolution
#[derive(Debug, Clone, PartialEq)]
pub struct InitialView {
    pub view: MapView,
    pub farm_id: Option<String>,
    /// Set when a lookup failed and the fallback was used
    pub notice: Option<Notice>,
}

/// Resolves the starting view from the page query string.
///
/// A missing parameter silently gives the fallback view. A failed lookup, or
/// a location outside valid ranges, gives the fallback view plus a notice.
pub async fn resolve_initial_view(
    query: &str,
    locator: &dyn FarmLocator,
    defaults: &ViewDefaults,
) -> InitialView {
    let Some(farm_id) = farm_id_from_query(query) else {
        return InitialView {
            view: defaults.fallback_view(),
            farm_id: None,
            notice: None,
        };
    };

    let result = match locator.locate(&farm_id).await {
        Ok(location) if location.is_valid() => Ok(location),
        Ok(_) => Err(LookupError::MissingLocation {
            farm_id: farm_id.clone(),
        }),
        Err(e) => Err(e),
    };

    match result {
        Ok(location) => {
            tracing::info!("Farm {} located at {}", farm_id, location);
            InitialView {
                view: defaults.located_view(location),
                farm_id: Some(farm_id),
                notice: None,
            }
        }
        Err(e) => {
            tracing::warn!("Falling back to default view: {}", e);
            InitialView {
                view: defaults.fallback_view(),
                notice: Some(Notice::warning(format!(
                    "Não foi possível localizar a fazenda: {}",
                    e
                ))),
                farm_id: Some(farm_id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farm_id_from_query() {
        assert_eq!(
            farm_id_from_query("?fazenda=abc-123&x=1"),
            Some("abc-123".to_string())
        );
        assert_eq!(
            farm_id_from_query("x=1&fazenda=abc"),
            Some("abc".to_string())
        );
        assert_eq!(farm_id_from_query("?fazenda="), None);
        assert_eq!(farm_id_from_query(""), None);
        assert_eq!(farm_id_from_query("?farm=abc"), None);
    }

    #[test]
    fn test_farm_id_from_encoded_query() {
        assert_eq!(
            farm_id_from_query("?fazenda=abc%2D123"),
            Some("abc-123".to_string())
        );
        assert_eq!(
            farm_id_from_query("fazenda=S%C3%A3o+Jos%C3%A9&x=1"),
            Some("São José".to_string())
        );
        assert_eq!(
            farm_id_from_query("?faz%65nda=f-9"),
            Some("f-9".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_param_is_silent_fallback() {
        let locator = StaticFarmLocator::new();
        let initial = resolve_initial_view("", &locator, &ViewDefaults::default()).await;
        assert_eq!(initial.view.center, LatLng::new(-23.5, -46.6));
        assert_eq!(initial.view.zoom, 17);
        assert!(initial.notice.is_none());
        assert!(initial.farm_id.is_none());
    }

    #[tokio::test]
    async fn test_located_farm() {
        let locator =
            StaticFarmLocator::new().with_farm("f1", Some(LatLng::new(-15.78, -47.93)));
        let initial =
            resolve_initial_view("?fazenda=f1", &locator, &ViewDefaults::default()).await;
        assert_eq!(initial.view.center, LatLng::new(-15.78, -47.93));
        assert_eq!(initial.view.zoom, 18);
        assert!(initial.notice.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_notifies() {
        let locator = StaticFarmLocator::new().with_farm("f2", None);
        let defaults = ViewDefaults::default();

        let missing = resolve_initial_view("?fazenda=f2", &locator, &defaults).await;
        assert_eq!(missing.view, defaults.fallback_view());
        assert!(missing.notice.is_some());

        let unknown = resolve_initial_view("?fazenda=nope", &locator, &defaults).await;
        assert_eq!(unknown.view, defaults.fallback_view());
        assert_eq!(unknown.farm_id.as_deref(), Some("nope"));
        assert!(unknown.notice.unwrap().message.contains("nope"));
    }
}
