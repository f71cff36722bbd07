use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::graphs;
use crate::error::ServiceError;

/// Chart families the analysis agent may emit and the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Area,
    Scatter,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
        }
    }
}

/// Chart payload: the row data plus optional axis-key hints. The row key
/// schema depends on the chart family (pie rows are name/value pairs,
/// line/bar/area rows are keyed by the axis hints, scatter rows are x/y
/// pairs), which the renderer interprets; rows stay opaque JSON here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub data: Vec<Value>,
    #[serde(default)]
    pub x_axis_key: Option<String>,
    #[serde(default)]
    pub y_axis_key: Option<String>,
}

/// A chart definition with identity: what the analysis endpoint emits and
/// the graphs collection persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub id: String,
    #[serde(rename = "type")]
    pub graph_type: ChartType,
    pub title: String,
    pub data: GraphData,
    #[serde(default)]
    pub extra: Option<Value>,
    #[serde(default)]
    pub justification: Option<String>,
}

/// Create/update payload for the graphs collection: a `Graph` minus identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphCreate {
    #[serde(rename = "type")]
    pub graph_type: ChartType,
    pub title: String,
    pub data: GraphData,
    #[serde(default)]
    pub extra: Option<Value>,
    #[serde(default)]
    pub justification: Option<String>,
}

impl GraphCreate {
    pub fn into_graph(self, id: String) -> Graph {
        Graph {
            id,
            graph_type: self.graph_type,
            title: self.title,
            data: self.data,
            extra: self.extra,
            justification: self.justification,
        }
    }
}

impl Graph {
    pub fn from_model(model: graphs::Model) -> Result<Self, ServiceError> {
        let graph_type = serde_json::from_value(Value::String(model.graph_type))
            .map_err(|_| ServiceError::Schema("stored graph has an unknown chart type".to_string()))?;
        let data = serde_json::from_value(model.data)
            .map_err(|err| ServiceError::Schema(format!("stored graph data is invalid: {}", err)))?;
        Ok(Graph {
            id: model.id,
            graph_type,
            title: model.title,
            data,
            extra: model.extra,
            justification: model.justification,
        })
    }

    pub fn into_active_model(self) -> Result<graphs::ActiveModel, ServiceError> {
        let data = serde_json::to_value(&self.data)
            .map_err(|err| ServiceError::Schema(format!("graph data is not serializable: {}", err)))?;
        Ok(graphs::ActiveModel {
            id: Set(self.id),
            graph_type: Set(self.graph_type.as_str().to_string()),
            title: Set(self.title),
            data: Set(data),
            extra: Set(self.extra),
            justification: Set(self.justification),
        })
    }
}
