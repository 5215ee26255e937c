//! Modelo de orden de servicio
//!
//! Este módulo contiene la orden de servicio, su máquina de etapas y el
//! historial auditable. El folio es un correlativo numérico de 4 dígitos
//! con ceros a la izquierda.

use crate::models::quality_check::QualityCheckRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Etapa de la orden - mapea al ENUM work_order_stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "work_order_stage", rename_all = "snake_case")]
pub enum WorkOrderStage {
    Recepcion,
    Diagnostico,
    PendienteCotizacion,
    EsperaAprobacion,
    EnReparacion,
    AtencionRequerida,
    ControlCalidad,
    ListoEntrega,
    Entregado,
    Cancelado,
}

/// Orden del pipeline para avances/retrocesos manuales.
/// Cancelado es absorbente y queda fuera del arreglo.
pub const STAGE_ORDER: [WorkOrderStage; 9] = [
    WorkOrderStage::Recepcion,
    WorkOrderStage::Diagnostico,
    WorkOrderStage::PendienteCotizacion,
    WorkOrderStage::EsperaAprobacion,
    WorkOrderStage::EnReparacion,
    WorkOrderStage::AtencionRequerida,
    WorkOrderStage::ControlCalidad,
    WorkOrderStage::ListoEntrega,
    WorkOrderStage::Entregado,
];

impl WorkOrderStage {
    /// Posición dentro del pipeline; None para Cancelado
    pub fn pipeline_index(&self) -> Option<usize> {
        STAGE_ORDER.iter().position(|s| s == self)
    }

    /// Etapa siguiente en el pipeline (avance manual)
    pub fn next(&self) -> Option<WorkOrderStage> {
        let idx = self.pipeline_index()?;
        STAGE_ORDER.get(idx + 1).copied()
    }

    /// Etapa anterior en el pipeline (retroceso manual)
    pub fn previous(&self) -> Option<WorkOrderStage> {
        let idx = self.pipeline_index()?;
        idx.checked_sub(1).and_then(|i| STAGE_ORDER.get(i)).copied()
    }

    /// Etiqueta legible, usada en historial y notificaciones
    pub fn label(&self) -> &'static str {
        match self {
            WorkOrderStage::Recepcion => "Recepción",
            WorkOrderStage::Diagnostico => "Diagnóstico",
            WorkOrderStage::PendienteCotizacion => "Pendiente de Cotización",
            WorkOrderStage::EsperaAprobacion => "Esperando Aprobación",
            WorkOrderStage::EnReparacion => "En Reparación",
            WorkOrderStage::AtencionRequerida => "Atención Requerida",
            WorkOrderStage::ControlCalidad => "Control de Calidad",
            WorkOrderStage::ListoEntrega => "Listo para Entrega",
            WorkOrderStage::Entregado => "Entregado",
            WorkOrderStage::Cancelado => "Cancelado",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStage::Recepcion => "recepcion",
            WorkOrderStage::Diagnostico => "diagnostico",
            WorkOrderStage::PendienteCotizacion => "pendiente_cotizacion",
            WorkOrderStage::EsperaAprobacion => "espera_aprobacion",
            WorkOrderStage::EnReparacion => "en_reparacion",
            WorkOrderStage::AtencionRequerida => "atencion_requerida",
            WorkOrderStage::ControlCalidad => "control_calidad",
            WorkOrderStage::ListoEntrega => "listo_entrega",
            WorkOrderStage::Entregado => "entregado",
            WorkOrderStage::Cancelado => "cancelado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "recepcion" => Some(WorkOrderStage::Recepcion),
            "diagnostico" => Some(WorkOrderStage::Diagnostico),
            "pendiente_cotizacion" => Some(WorkOrderStage::PendienteCotizacion),
            "espera_aprobacion" => Some(WorkOrderStage::EsperaAprobacion),
            "en_reparacion" => Some(WorkOrderStage::EnReparacion),
            "atencion_requerida" => Some(WorkOrderStage::AtencionRequerida),
            "control_calidad" => Some(WorkOrderStage::ControlCalidad),
            "listo_entrega" => Some(WorkOrderStage::ListoEntrega),
            "entregado" => Some(WorkOrderStage::Entregado),
            "cancelado" => Some(WorkOrderStage::Cancelado),
            _ => None,
        }
    }

    /// Etapas que la reconciliación nunca sobreescribe
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkOrderStage::Entregado | WorkOrderStage::Cancelado)
    }
}

/// Estado grueso del ciclo de vida - mapea al ENUM work_order_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "work_order_status", rename_all = "snake_case")]
pub enum WorkOrderStatus {
    EnProceso,
    ListoParaEntrega,
    Cancelado,
    Facturado,
}

impl WorkOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::EnProceso => "en_proceso",
            WorkOrderStatus::ListoParaEntrega => "listo_para_entrega",
            WorkOrderStatus::Cancelado => "cancelado",
            WorkOrderStatus::Facturado => "facturado",
        }
    }
}

/// Estado coherente con una etapa dada.
/// Facturado no se degrada; el resto se deriva de la etapa.
pub fn status_for_stage(stage: WorkOrderStage, current: WorkOrderStatus) -> WorkOrderStatus {
    if current == WorkOrderStatus::Facturado && stage != WorkOrderStage::Cancelado {
        return WorkOrderStatus::Facturado;
    }
    match stage {
        WorkOrderStage::Cancelado => WorkOrderStatus::Cancelado,
        WorkOrderStage::ListoEntrega | WorkOrderStage::Entregado => WorkOrderStatus::ListoParaEntrega,
        _ => WorkOrderStatus::EnProceso,
    }
}

/// Entrada del historial auditable.
/// El formato serializado (camelCase) lo consumen los reportes imprimibles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Etiqueta legible de la etapa, p. ej. "Esperando Aprobación"
    pub stage: String,
    pub date: DateTime<Utc>,
    pub user: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_checks_data: Option<Vec<QualityCheckRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_summary: Option<String>,
}

impl HistoryEntry {
    pub fn new(stage: WorkOrderStage, user: &str, notes: &str) -> Self {
        Self {
            stage: stage.label().to_string(),
            date: Utc::now(),
            user: user.to_string(),
            notes: notes.to_string(),
            image_urls: None,
            quality_checks_data: None,
            checklist_summary: None,
        }
    }
}

/// Hallazgo puntual del diagnóstico
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticPoint {
    pub component: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Checklist de recepción/diagnóstico.
/// Su presencia en la orden significa diagnóstico completado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticData {
    pub inspector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(default)]
    pub points: Vec<DiagnosticPoint>,
}

/// Imprevisto reportado durante la reparación (lista append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnforeseenIssue {
    pub description: String,
    pub reported_by: String,
    pub date: DateTime<Utc>,
}

/// Orden de servicio - mapea a la tabla work_orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkOrder {
    /// Folio correlativo de 4 dígitos ("0001")
    pub id: String,
    pub client_id: Uuid,
    pub client_name: String,
    pub vehicle_id: Uuid,
    pub vehicle_label: String,
    pub location_id: Option<Uuid>,
    pub stage: WorkOrderStage,
    pub status: WorkOrderStatus,
    pub linked_quote_ids: Json<Vec<Uuid>>,
    pub diagnostic_data: Option<Json<DiagnosticData>>,
    pub history: Json<Vec<HistoryEntry>>,
    pub unforeseen_issues: Json<Vec<UnforeseenIssue>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkOrder {
    /// El diagnóstico guardado habilita la cotización
    pub fn has_diagnostic(&self) -> bool {
        self.diagnostic_data.is_some()
    }

    pub fn linked_quote_ids(&self) -> &[Uuid] {
        &self.linked_quote_ids.0
    }
}

/// Formatear un folio correlativo; pasado 9999 sigue creciendo sin recorte
pub fn format_folio(n: i64) -> String {
    format!("{:04}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_is_the_full_pipeline() {
        assert_eq!(STAGE_ORDER.len(), 9);
        assert_eq!(STAGE_ORDER[0], WorkOrderStage::Recepcion);
        assert_eq!(STAGE_ORDER[8], WorkOrderStage::Entregado);
        assert!(WorkOrderStage::Cancelado.pipeline_index().is_none());
    }

    #[test]
    fn test_manual_advance_follows_array_order() {
        assert_eq!(WorkOrderStage::Recepcion.next(), Some(WorkOrderStage::Diagnostico));
        assert_eq!(
            WorkOrderStage::EnReparacion.next(),
            Some(WorkOrderStage::AtencionRequerida)
        );
        assert_eq!(WorkOrderStage::Entregado.next(), None);
        assert_eq!(WorkOrderStage::Cancelado.next(), None);
    }

    #[test]
    fn test_manual_retreat_follows_array_order() {
        assert_eq!(
            WorkOrderStage::Diagnostico.previous(),
            Some(WorkOrderStage::Recepcion)
        );
        assert_eq!(WorkOrderStage::Recepcion.previous(), None);
        assert_eq!(WorkOrderStage::Cancelado.previous(), None);
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(WorkOrderStage::EsperaAprobacion.label(), "Esperando Aprobación");
        assert_eq!(WorkOrderStage::PendienteCotizacion.label(), "Pendiente de Cotización");
    }

    #[test]
    fn test_stage_str_round_trip() {
        for stage in STAGE_ORDER.iter().chain([WorkOrderStage::Cancelado].iter()) {
            assert_eq!(WorkOrderStage::from_str(stage.as_str()), Some(*stage));
        }
    }

    #[test]
    fn test_status_for_stage() {
        assert_eq!(
            status_for_stage(WorkOrderStage::EnReparacion, WorkOrderStatus::EnProceso),
            WorkOrderStatus::EnProceso
        );
        assert_eq!(
            status_for_stage(WorkOrderStage::ListoEntrega, WorkOrderStatus::EnProceso),
            WorkOrderStatus::ListoParaEntrega
        );
        assert_eq!(
            status_for_stage(WorkOrderStage::Cancelado, WorkOrderStatus::EnProceso),
            WorkOrderStatus::Cancelado
        );
        // Facturado no se degrada por cambios de etapa
        assert_eq!(
            status_for_stage(WorkOrderStage::Entregado, WorkOrderStatus::Facturado),
            WorkOrderStatus::Facturado
        );
    }

    #[test]
    fn test_format_folio() {
        assert_eq!(format_folio(1), "0001");
        assert_eq!(format_folio(42), "0042");
        assert_eq!(format_folio(9999), "9999");
        assert_eq!(format_folio(10000), "10000");
    }
}
