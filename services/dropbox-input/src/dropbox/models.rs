use serde::{Deserialize, Serialize};

pub const GET_EVENTS_PATH: &str = "/2/team_log/get_events";
pub const GET_EVENTS_CONTINUE_PATH: &str = "/2/team_log/get_events/continue";

/// Body of a first-page `team_log/get_events` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetEventsArg {
    pub time: TimeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start_time: String,
}

/// Body of a `team_log/get_events/continue` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetEventsContinueArg {
    pub cursor: String,
}

/// One page request: either the first page of a walk or a continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventsRequest {
    Start(GetEventsArg),
    Continue(GetEventsContinueArg),
}

impl EventsRequest {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Start(_) => GET_EVENTS_PATH,
            Self::Continue(_) => GET_EVENTS_CONTINUE_PATH,
        }
    }
}

/// One page of the team log. Events are kept as raw JSON and forwarded
/// untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsPage {
    pub events: Vec<serde_json::Value>,
    pub has_more: bool,
    pub cursor: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_body_omits_missing_category() {
        let req = EventsRequest::Start(GetEventsArg {
            time: TimeRange {
                start_time: "2024-01-15T00:00:00Z".to_owned(),
            },
            category: None,
        });
        assert_eq!(req.path(), "/2/team_log/get_events");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"time": {"start_time": "2024-01-15T00:00:00Z"}})
        );
    }

    #[test]
    fn start_body_includes_category() {
        let req = EventsRequest::Start(GetEventsArg {
            time: TimeRange {
                start_time: "2024-01-15T00:00:00Z".to_owned(),
            },
            category: Some("logins".to_owned()),
        });
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"time": {"start_time": "2024-01-15T00:00:00Z"}, "category": "logins"})
        );
    }

    #[test]
    fn continue_body_is_cursor_only() {
        let req = EventsRequest::Continue(GetEventsContinueArg {
            cursor: "AAEC1".to_owned(),
        });
        assert_eq!(req.path(), "/2/team_log/get_events/continue");
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"cursor": "AAEC1"}));
    }

    #[test]
    fn page_keeps_events_opaque() {
        let page: EventsPage = serde_json::from_value(json!({
            "events": [
                {"event_type": {".tag": "login_success"}, "timestamp": "2024-01-15T08:00:00Z"},
                {"event_type": {".tag": "file_add"}, "details": {"nested": [1, 2]}}
            ],
            "has_more": true,
            "cursor": "AAEC1"
        }))
        .unwrap();

        assert_eq!(page.events.len(), 2);
        assert_eq!(page.events[1]["details"]["nested"][1], 2);
        assert!(page.has_more);
        assert_eq!(page.cursor, "AAEC1");
    }
}
