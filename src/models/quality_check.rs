//! Catálogo de control de calidad
//!
//! Checklist fijo de inspección final (15 puntos en 4 categorías) y la
//! codificación legada del resumen (`id:estado[:notas]` unidos por `|`)
//! que los reportes imprimibles siguen consumiendo.

use serde::{Deserialize, Serialize};

/// Estado de un punto del checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCheckStatus {
    Ok,
    NoOk,
    NoAplica,
    SinRevisar,
}

impl QualityCheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityCheckStatus::Ok => "ok",
            QualityCheckStatus::NoOk => "no-ok",
            QualityCheckStatus::NoAplica => "n/a",
            QualityCheckStatus::SinRevisar => "unset",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(QualityCheckStatus::Ok),
            "no-ok" => Some(QualityCheckStatus::NoOk),
            "n/a" => Some(QualityCheckStatus::NoAplica),
            "unset" => Some(QualityCheckStatus::SinRevisar),
            _ => None,
        }
    }

    /// Un punto queda resuelto cuando deja el estado inicial
    pub fn is_resolved(&self) -> bool {
        !matches!(self, QualityCheckStatus::SinRevisar)
    }
}

/// Definición de un punto del catálogo
#[derive(Debug, Clone, Copy)]
pub struct QualityCheckDefinition {
    pub id: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

/// Catálogo fijo de inspección final
pub const QUALITY_CHECKLIST: [QualityCheckDefinition; 15] = [
    // Motor
    QualityCheckDefinition { id: "motor_aceite", description: "Nivel y estado de aceite", category: "Motor" },
    QualityCheckDefinition { id: "motor_fugas", description: "Ausencia de fugas visibles", category: "Motor" },
    QualityCheckDefinition { id: "motor_ruidos", description: "Sin ruidos anómalos en marcha", category: "Motor" },
    QualityCheckDefinition { id: "motor_temperatura", description: "Temperatura de operación estable", category: "Motor" },
    // Seguridad
    QualityCheckDefinition { id: "seg_frenos", description: "Frenos con respuesta correcta", category: "Seguridad" },
    QualityCheckDefinition { id: "seg_luces", description: "Luces delanteras y traseras", category: "Seguridad" },
    QualityCheckDefinition { id: "seg_neumaticos", description: "Presión y desgaste de neumáticos", category: "Seguridad" },
    QualityCheckDefinition { id: "seg_cinturones", description: "Cinturones de seguridad", category: "Seguridad" },
    // Exterior
    QualityCheckDefinition { id: "ext_carroceria", description: "Carrocería sin daños nuevos", category: "Exterior" },
    QualityCheckDefinition { id: "ext_cristales", description: "Cristales y parabrisas", category: "Exterior" },
    QualityCheckDefinition { id: "ext_espejos", description: "Espejos laterales y retrovisor", category: "Exterior" },
    // Interior
    QualityCheckDefinition { id: "int_tablero", description: "Tablero sin testigos encendidos", category: "Interior" },
    QualityCheckDefinition { id: "int_controles", description: "Controles y mandos funcionales", category: "Interior" },
    QualityCheckDefinition { id: "int_climatizacion", description: "Climatización operativa", category: "Interior" },
    QualityCheckDefinition { id: "int_limpieza", description: "Limpieza interior de entrega", category: "Interior" },
];

/// Buscar un punto del catálogo por id
pub fn find_check_definition(id: &str) -> Option<&'static QualityCheckDefinition> {
    QUALITY_CHECKLIST.iter().find(|d| d.id == id)
}

/// Resultado final de un punto, tal como queda registrado en el historial
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheckRecord {
    pub id: String,
    pub description: String,
    pub category: String,
    pub status: QualityCheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Resolución de un punto tal como llega del inspector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheckInput {
    pub id: String,
    pub status: QualityCheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Codificar el resumen legado: `id:estado[:notas]` unidos por `|`.
/// Las notas se sanean para que el formato siga siendo parseable.
pub fn encode_checklist_summary(records: &[QualityCheckRecord]) -> String {
    records
        .iter()
        .map(|r| match &r.notes {
            Some(notes) if !notes.trim().is_empty() => {
                format!("{}:{}:{}", r.id, r.status.as_str(), sanitize_notes(notes))
            }
            _ => format!("{}:{}", r.id, r.status.as_str()),
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Parsear el resumen legado de vuelta a registros.
/// La descripción y categoría se rehidratan desde el catálogo.
pub fn parse_checklist_summary(summary: &str) -> Result<Vec<QualityCheckRecord>, String> {
    if summary.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for token in summary.split('|') {
        let mut parts = token.splitn(3, ':');
        let id = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("token inválido: '{}'", token))?;
        let status_str = parts
            .next()
            .ok_or_else(|| format!("token sin estado: '{}'", token))?;
        let status = QualityCheckStatus::from_str(status_str)
            .ok_or_else(|| format!("estado desconocido '{}' en token '{}'", status_str, token))?;
        let notes = parts.next().map(|s| s.to_string());

        let definition = find_check_definition(id);
        records.push(QualityCheckRecord {
            id: id.to_string(),
            description: definition.map(|d| d.description.to_string()).unwrap_or_default(),
            category: definition.map(|d| d.category.to_string()).unwrap_or_default(),
            status,
            notes,
        });
    }
    Ok(records)
}

/// Quitar los delimitadores del formato de las notas libres
fn sanitize_notes(notes: &str) -> String {
    notes.replace(['|', ':'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: QualityCheckStatus, notes: Option<&str>) -> QualityCheckRecord {
        let def = find_check_definition(id).expect("id fuera de catálogo");
        QualityCheckRecord {
            id: id.to_string(),
            description: def.description.to_string(),
            category: def.category.to_string(),
            status,
            notes: notes.map(|n| n.to_string()),
        }
    }

    #[test]
    fn test_catalogue_has_15_items_in_4_categories() {
        assert_eq!(QUALITY_CHECKLIST.len(), 15);
        let mut categories: Vec<&str> = QUALITY_CHECKLIST.iter().map(|d| d.category).collect();
        categories.sort();
        categories.dedup();
        assert_eq!(categories.len(), 4);
    }

    #[test]
    fn test_catalogue_ids_are_unique() {
        let mut ids: Vec<&str> = QUALITY_CHECKLIST.iter().map(|d| d.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_encode_without_notes() {
        let records = vec![
            record("motor_aceite", QualityCheckStatus::Ok, None),
            record("seg_frenos", QualityCheckStatus::NoOk, None),
        ];
        assert_eq!(encode_checklist_summary(&records), "motor_aceite:ok|seg_frenos:no-ok");
    }

    #[test]
    fn test_encode_with_notes() {
        let records = vec![record("seg_frenos", QualityCheckStatus::NoOk, Some("pastillas al 20%"))];
        assert_eq!(
            encode_checklist_summary(&records),
            "seg_frenos:no-ok:pastillas al 20%"
        );
    }

    #[test]
    fn test_notes_are_sanitized() {
        let records = vec![record("seg_frenos", QualityCheckStatus::NoOk, Some("ojo: disco|pastilla"))];
        let encoded = encode_checklist_summary(&records);
        let parsed = parse_checklist_summary(&encoded).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "seg_frenos");
    }

    #[test]
    fn test_round_trip() {
        let records = vec![
            record("motor_aceite", QualityCheckStatus::Ok, None),
            record("ext_espejos", QualityCheckStatus::NoAplica, None),
            record("seg_frenos", QualityCheckStatus::NoOk, Some("requiere seguimiento")),
        ];
        let encoded = encode_checklist_summary(&records);
        let parsed = parse_checklist_summary(&encoded).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert!(parse_checklist_summary("motor_aceite:maybe").is_err());
    }

    #[test]
    fn test_parse_empty_summary() {
        assert!(parse_checklist_summary("").unwrap().is_empty());
    }
}
