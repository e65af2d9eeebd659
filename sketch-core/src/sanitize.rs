//! Defensive conversion of untrusted JSON into a valid [`Project`].
//!
//! Every field is read on its own and replaced by a safe default when it is
//! missing or malformed, so stored data written by older builds (or edited by
//! hand) still loads. Only [`validate_import`] rejects anything outright.

use serde_json::{Map, Value};

use crate::element::{Element, ElementType, ScreenState, SemanticTag, MIN_ELEMENT_SIZE};
use crate::error::{CoreError, CoreResult};
use crate::id::{ArrowId, ElementId, ProjectId, ScreenId, VersionId};
use crate::project::{
    DeviceType, FlowArrow, Project, Screen, VersionSnapshot, DEFAULT_PROJECT_NAME, FLOW_SPACING,
};

/// Build a valid project from arbitrary JSON. Never fails.
#[must_use]
pub fn sanitize_project(value: &Value) -> Project {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    let screens = sanitize_screens(obj.get("screens"));
    let mut project = Project {
        id: read_id(obj, "id").map_or_else(ProjectId::new, ProjectId::from_string),
        name: read_string(obj, "name").unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
        goal: read_string(obj, "goal").unwrap_or_default(),
        device: read_string(obj, "device")
            .and_then(|d| DeviceType::parse(&d))
            .unwrap_or_default(),
        screens,
        arrows: read_array(obj, "arrows")
            .iter()
            .filter_map(sanitize_arrow)
            .collect(),
        versions: read_array(obj, "versions")
            .iter()
            .filter_map(sanitize_version)
            .collect(),
    };
    project.prune_arrows();
    project
}

/// Parse and sanitize an imported project file.
///
/// # Errors
///
/// Returns [`CoreError::Serialization`] for text that is not JSON and
/// [`CoreError::InvalidImport`] when there is no non-empty `screens` array.
pub fn validate_import(json: &str) -> CoreResult<Project> {
    let value: Value = serde_json::from_str(json)?;
    let has_screens = value
        .get("screens")
        .and_then(Value::as_array)
        .is_some_and(|screens| !screens.is_empty());
    if !has_screens {
        return Err(CoreError::InvalidImport(
            "project must contain a non-empty screens array".to_string(),
        ));
    }
    Ok(sanitize_project(&value))
}

/// Parse stored text, treating any failure as "not found".
#[must_use]
pub fn parse_stored(json: &str) -> Option<Project> {
    match serde_json::from_str::<Value>(json) {
        Ok(value) if value.is_object() => Some(sanitize_project(&value)),
        Ok(_) => {
            tracing::warn!("Stored project is not a JSON object; ignoring");
            None
        }
        Err(e) => {
            tracing::warn!("Failed to parse stored project: {e}");
            None
        }
    }
}

fn sanitize_screens(value: Option<&Value>) -> Vec<Screen> {
    let screens: Vec<Screen> = value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| sanitize_screen(item, idx))
                .collect()
        })
        .unwrap_or_default();
    if screens.is_empty() {
        vec![Screen::new("Screen 1")]
    } else {
        screens
    }
}

#[allow(clippy::cast_precision_loss)]
fn sanitize_screen(value: &Value, idx: usize) -> Option<Screen> {
    let obj = value.as_object()?;
    Some(Screen {
        id: read_id(obj, "id").map_or_else(ScreenId::new, ScreenId::from_string),
        name: read_string(obj, "name").unwrap_or_else(|| format!("Screen {}", idx + 1)),
        user_goal: read_string(obj, "userGoal").unwrap_or_default(),
        elements: read_array(obj, "elements")
            .iter()
            .filter_map(sanitize_element)
            .collect(),
        active_state: read_string(obj, "activeState")
            .and_then(|s| ScreenState::parse(&s))
            .unwrap_or_default(),
        flow_x: read_number(obj, "flowX").unwrap_or(idx as f64 * FLOW_SPACING),
        flow_y: read_number(obj, "flowY").unwrap_or(0.0),
    })
}

fn sanitize_element(value: &Value) -> Option<Element> {
    let obj = value.as_object()?;
    let kind = read_string(obj, "type").and_then(|t| ElementType::parse(&t))?;
    let (default_w, default_h) = kind.default_size();
    Some(Element {
        id: read_id(obj, "id").map_or_else(ElementId::new, ElementId::from_string),
        kind,
        x: read_number(obj, "x").unwrap_or(0.0),
        y: read_number(obj, "y").unwrap_or(0.0),
        width: read_number(obj, "width")
            .unwrap_or(default_w)
            .max(MIN_ELEMENT_SIZE),
        height: read_number(obj, "height")
            .unwrap_or(default_h)
            .max(MIN_ELEMENT_SIZE),
        label: read_string(obj, "label").unwrap_or_else(|| kind.default_label().to_string()),
        annotation: read_string(obj, "annotation").unwrap_or_default(),
        semantic_tag: read_string(obj, "semanticTag")
            .and_then(|t| SemanticTag::parse(&t))
            .unwrap_or_default(),
        screen_state: read_string(obj, "screenState")
            .and_then(|s| ScreenState::parse(&s))
            .unwrap_or_default(),
    })
}

fn sanitize_arrow(value: &Value) -> Option<FlowArrow> {
    let obj = value.as_object()?;
    Some(FlowArrow {
        id: read_id(obj, "id").map_or_else(ArrowId::new, ArrowId::from_string),
        from_screen_id: ScreenId::from_string(read_id(obj, "fromScreenId")?),
        to_screen_id: ScreenId::from_string(read_id(obj, "toScreenId")?),
        trigger: read_string(obj, "trigger").unwrap_or_default(),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sanitize_version(value: &Value) -> Option<VersionSnapshot> {
    let obj = value.as_object()?;
    let screens = sanitize_screens(obj.get("screens"));
    let mut arrows: Vec<FlowArrow> = read_array(obj, "arrows")
        .iter()
        .filter_map(sanitize_arrow)
        .collect();
    arrows.retain(|a| {
        screens.iter().any(|s| s.id == a.from_screen_id)
            && screens.iter().any(|s| s.id == a.to_screen_id)
    });
    Some(VersionSnapshot {
        id: read_id(obj, "id").map_or_else(VersionId::new, VersionId::from_string),
        timestamp: read_number(obj, "timestamp").map_or(0, |t| t.max(0.0) as u64),
        label: read_string(obj, "label").unwrap_or_default(),
        screens,
        arrows,
    })
}

fn read_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn read_id(obj: &Map<String, Value>, key: &str) -> Option<String> {
    read_string(obj, key).filter(|s| !s.is_empty())
}

fn read_number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn read_array<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}
