//! ヘルス計測値型定義
//!
//! プローブ結果（計測値）と集約結果の型。
//! 計測値は生成後に変更されない（フィールドは読み取り専用アクセサ経由で公開）。

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// HTTPチェックの`componentType`
pub const COMPONENT_TYPE_HTTP: &str = "http";

/// 所要時間計測値の単位
pub const DURATION_UNIT: &str = "ms";

/// 3値ヘルスステータス
///
/// 重大度順に `Pass < Warn < Fail` で全順序を持つ。
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// 正常
    #[default]
    Pass,
    /// 警告（may-fail層の失敗）
    Warn,
    /// 異常
    Fail,
}

impl Status {
    /// 文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Warn => "warn",
            Status::Fail => "fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 計測種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    /// HTTP呼び出しが成功レスポンスを返したか
    Status,
    /// HTTP呼び出しの所要時間
    Duration,
}

impl MeasurementKind {
    /// 文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::Status => "status",
            MeasurementKind::Duration => "duration",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 計測キー（コンポーネント名 + 計測種別）
///
/// `"<component_name>:<measurement_name>"` の形式で表示される。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasurementKey {
    /// コンポーネント名（プローブ対象URL）
    pub component_name: String,
    /// 計測種別
    pub measurement_name: MeasurementKind,
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component_name, self.measurement_name)
    }
}

/// 観測値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedValue {
    /// HTTPステータスコード
    StatusCode(u16),
    /// レスポンスを受信できなかった
    NoResponse,
    /// 経過時間
    Duration(Duration),
}

impl ObservedValue {
    /// HTTPステータスコード（`StatusCode`以外は`None`）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ObservedValue::StatusCode(code) => Some(*code),
            _ => None,
        }
    }

    /// 経過時間（`Duration`以外は`None`）
    pub fn duration(&self) -> Option<Duration> {
        match self {
            ObservedValue::Duration(elapsed) => Some(*elapsed),
            _ => None,
        }
    }
}

// observedValue: ステータスコードは整数、未受信はnull、経過時間はミリ秒（小数）
impl Serialize for ObservedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ObservedValue::StatusCode(code) => serializer.serialize_u16(*code),
            ObservedValue::NoResponse => serializer.serialize_none(),
            ObservedValue::Duration(elapsed) => {
                serializer.serialize_f64(elapsed.as_secs_f64() * 1000.0)
            }
        }
    }
}

/// 計測値
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(skip)]
    key: MeasurementKey,
    component_type: &'static str,
    observed_value: ObservedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_unit: Option<&'static str>,
    status: Status,
    time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
}

impl Measurement {
    fn new(
        component: &str,
        kind: MeasurementKind,
        observed_value: ObservedValue,
        status: Status,
        output: Option<String>,
    ) -> Self {
        Self {
            key: MeasurementKey {
                component_name: component.to_string(),
                measurement_name: kind,
            },
            component_type: COMPONENT_TYPE_HTTP,
            observed_value,
            observed_unit: match kind {
                MeasurementKind::Duration => Some(DURATION_UNIT),
                MeasurementKind::Status => None,
            },
            status,
            time: Utc::now(),
            output,
        }
    }

    /// レスポンスのステータスコードから`status`計測値を作成
    ///
    /// 2xxは`Pass`、それ以外は`Fail`（`output`に理由句を残す）。
    pub fn from_status_code(component: &str, status_code: u16) -> Self {
        if (200..300).contains(&status_code) {
            return Self::new(
                component,
                MeasurementKind::Status,
                ObservedValue::StatusCode(status_code),
                Status::Pass,
                None,
            );
        }

        let output = match reqwest::StatusCode::from_u16(status_code)
            .ok()
            .and_then(|code| code.canonical_reason())
        {
            Some(reason) => format!("HTTP {} {}", status_code, reason),
            None => format!("HTTP {}", status_code),
        };
        Self::new(
            component,
            MeasurementKind::Status,
            ObservedValue::StatusCode(status_code),
            Status::Fail,
            Some(output),
        )
    }

    /// レスポンス未受信の`status`計測値を作成（常に`Fail`）
    pub fn no_response(component: &str, error: impl Into<String>) -> Self {
        Self::new(
            component,
            MeasurementKind::Status,
            ObservedValue::NoResponse,
            Status::Fail,
            Some(error.into()),
        )
    }

    /// `duration`計測値を作成（記録のみで判定しないため常に`Pass`）
    pub fn from_duration(component: &str, elapsed: Duration) -> Self {
        Self::new(
            component,
            MeasurementKind::Duration,
            ObservedValue::Duration(elapsed),
            Status::Pass,
            None,
        )
    }

    /// 計測キー
    pub fn key(&self) -> &MeasurementKey {
        &self.key
    }

    /// 計測種別
    pub fn kind(&self) -> MeasurementKind {
        self.key.measurement_name
    }

    /// コンポーネント名（プローブ対象URL）
    pub fn component_name(&self) -> &str {
        &self.key.component_name
    }

    /// コンポーネント種別
    pub fn component_type(&self) -> &str {
        self.component_type
    }

    /// ステータス
    pub fn status(&self) -> Status {
        self.status
    }

    /// 観測値
    pub fn observed_value(&self) -> ObservedValue {
        self.observed_value
    }

    /// 観測値の単位
    pub fn observed_unit(&self) -> Option<&str> {
        self.observed_unit
    }

    /// 計測時刻
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// 診断メッセージ
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

/// URLの重要度層
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// 失敗が全体の失敗となる
    MustPass,
    /// 失敗は警告に留まる
    MayFail,
}

impl Tier {
    /// 文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::MustPass => "must_pass",
            Tier::MayFail => "may_fail",
        }
    }

    /// この層の`status`計測値が失敗した場合の全体ステータス
    pub fn failure_status(&self) -> Status {
        match self {
            Tier::MustPass => Status::Fail,
            Tier::MayFail => Status::Warn,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 集約結果
///
/// 全計測値（must-pass層→may-fail層、各層は入力順）と、
/// それらから導出された全体ステータス。
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    measurements: Vec<Measurement>,
    status: Status,
}

impl AggregationResult {
    pub(crate) fn new(measurements: Vec<Measurement>, status: Status) -> Self {
        Self {
            measurements,
            status,
        }
    }

    /// 全体ステータス
    pub fn status(&self) -> Status {
        self.status
    }

    /// 全計測値
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// 計測値と全体ステータスに分解
    pub fn into_parts(self) -> (Vec<Measurement>, Status) {
        (self.measurements, self.status)
    }

    /// `status`種別の計測値のみ
    pub fn status_measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements
            .iter()
            .filter(|m| m.kind() == MeasurementKind::Status)
    }

    /// `"<component>:<measurement>"`キーでグループ化した計測値（初出順）
    pub fn checks(&self) -> Vec<(String, Vec<&Measurement>)> {
        let mut groups: Vec<(String, Vec<&Measurement>)> = Vec::new();
        for measurement in &self.measurements {
            let key = measurement.key().to_string();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, group)) => group.push(measurement),
                None => groups.push((key, vec![measurement])),
            }
        }
        groups
    }
}

struct Checks<'a>(Vec<(String, Vec<&'a Measurement>)>);

impl Serialize for Checks<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, group) in &self.0 {
            map.serialize_entry(key, group)?;
        }
        map.end()
    }
}

impl Serialize for AggregationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AggregationResult", 2)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("checks", &Checks(self.checks()))?;
        state.end()
    }
}
