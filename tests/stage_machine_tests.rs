//! Escenarios de extremo a extremo sobre el núcleo puro de la máquina de
//! etapas: el ciclo completo recepción → entrega guiado por cotizaciones,
//! la compuerta de término y el checklist de control de calidad.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::types::Json;
use uuid::Uuid;

use taller_backend::models::quality_check::{
    encode_checklist_summary, parse_checklist_summary, QualityCheckRecord, QualityCheckStatus,
    QUALITY_CHECKLIST,
};
use taller_backend::models::quote::{compute_totals, Quote, QuoteItem, QuoteStatus};
use taller_backend::models::work_order::{
    status_for_stage, DiagnosticData, HistoryEntry, WorkOrder, WorkOrderStage, WorkOrderStatus,
};
use taller_backend::services::progress_service::all_items_complete;
use taller_backend::services::stage_service::determine_correct_stage;

fn new_order() -> WorkOrder {
    WorkOrder {
        id: "0001".to_string(),
        client_id: Uuid::new_v4(),
        client_name: "María González".to_string(),
        vehicle_id: Uuid::new_v4(),
        vehicle_label: "Nissan Versa (XYZ-987)".to_string(),
        location_id: None,
        stage: WorkOrderStage::Recepcion,
        status: WorkOrderStatus::EnProceso,
        linked_quote_ids: Json(Vec::new()),
        diagnostic_data: None,
        history: Json(vec![HistoryEntry::new(
            WorkOrderStage::Recepcion,
            "asesor",
            "Vehículo recibido en recepción",
        )]),
        unforeseen_issues: Json(Vec::new()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn with_diagnostic(mut order: WorkOrder) -> WorkOrder {
    order.diagnostic_data = Some(Json(DiagnosticData {
        inspector: "Pedro Ramírez".to_string(),
        mileage: Some(120_500),
        fuel_level: Some("1/2".to_string()),
        observations: Some("Ruido en tren delantero".to_string()),
        points: Vec::new(),
    }));
    order
}

fn item(description: &str, price: i64, completed: bool) -> QuoteItem {
    QuoteItem {
        id: Uuid::new_v4(),
        description: description.to_string(),
        quantity: Decimal::ONE,
        unit_price: Decimal::from(price),
        discount_percent: Decimal::ZERO,
        tax_rate: Decimal::from(16),
        is_completed: completed,
        image_urls: Vec::new(),
        cost_price: None,
        supplier_id: None,
    }
}

fn quote(order: &WorkOrder, status: QuoteStatus, items: Vec<QuoteItem>) -> Quote {
    let totals = compute_totals(&items);
    Quote {
        id: Uuid::new_v4(),
        folio: Some("C-0001".to_string()),
        folio_number: 1,
        work_order_id: order.id.clone(),
        status,
        items: Json(items),
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        total: totals.total,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Aplica la etapa calculada a la orden, como haría la reconciliación
fn settle(order: &mut WorkOrder, quotes: &[Quote]) -> WorkOrderStage {
    let target = determine_correct_stage(order, quotes);
    order.status = status_for_stage(target, order.status);
    order.stage = target;
    target
}

#[test]
fn full_lifecycle_from_reception_to_delivery() {
    let mut order = new_order();

    // Sin diagnóstico la orden no sale de recepción
    assert_eq!(settle(&mut order, &[]), WorkOrderStage::Recepcion);

    // Diagnóstico guardado, sin cotizaciones
    order = with_diagnostic(order);
    assert_eq!(settle(&mut order, &[]), WorkOrderStage::PendienteCotizacion);

    // Borrador creado: sigue pendiente de cotización
    let mut q = quote(
        &order,
        QuoteStatus::Borrador,
        vec![item("Cambio de amortiguadores", 2_400, false)],
    );
    assert_eq!(
        settle(&mut order, std::slice::from_ref(&q)),
        WorkOrderStage::PendienteCotizacion
    );

    // Enviada al cliente
    q.status = QuoteStatus::Enviado;
    assert_eq!(
        settle(&mut order, std::slice::from_ref(&q)),
        WorkOrderStage::EsperaAprobacion
    );
    assert_eq!(order.stage.label(), "Esperando Aprobación");

    // Aprobada: pasa a reparación
    q.status = QuoteStatus::Aprobado;
    assert_eq!(
        settle(&mut order, std::slice::from_ref(&q)),
        WorkOrderStage::EnReparacion
    );
    assert_eq!(order.status, WorkOrderStatus::EnProceso);

    // La compuerta sigue cerrada hasta completar la partida
    assert!(!all_items_complete(std::slice::from_ref(&q)));
    q.items.0[0].is_completed = true;
    assert!(all_items_complete(std::slice::from_ref(&q)));

    // Control de calidad y entrega son movimientos manuales; la
    // reconciliación no los deshace aunque la aprobación siga presente
    order.stage = WorkOrderStage::ControlCalidad;
    assert_eq!(
        settle(&mut order, std::slice::from_ref(&q)),
        WorkOrderStage::ControlCalidad
    );

    order.stage = WorkOrderStage::ListoEntrega;
    order.status = status_for_stage(order.stage, order.status);
    assert_eq!(order.status, WorkOrderStatus::ListoParaEntrega);

    order.stage = WorkOrderStage::Entregado;
    assert_eq!(
        settle(&mut order, std::slice::from_ref(&q)),
        WorkOrderStage::Entregado
    );
}

#[test]
fn second_quote_after_approval_does_not_retreat_order() {
    let mut order = with_diagnostic(new_order());
    order.stage = WorkOrderStage::EnReparacion;

    let approved = quote(
        &order,
        QuoteStatus::Aprobado,
        vec![item("Cambio de balatas", 900, true)],
    );
    // Un imprevisto genera una segunda cotización que se envía al cliente
    let sent = quote(
        &order,
        QuoteStatus::Enviado,
        vec![item("Reemplazo de disco", 1_500, false)],
    );

    let quotes = vec![approved.clone(), sent.clone()];
    assert_eq!(settle(&mut order, &quotes), WorkOrderStage::EnReparacion);

    // La partida nueva no cierra la compuerta hasta ser aprobada y completada
    assert!(all_items_complete(&quotes));
    let mut approved_second = sent;
    approved_second.status = QuoteStatus::Aprobado;
    let quotes = vec![approved, approved_second];
    assert!(!all_items_complete(&quotes));
}

#[test]
fn rejected_quote_sends_order_to_attention_required() {
    let mut order = with_diagnostic(new_order());
    order.stage = WorkOrderStage::EsperaAprobacion;

    let rejected = quote(
        &order,
        QuoteStatus::Rechazado,
        vec![item("Cambio de clutch", 7_800, false)],
    );
    assert_eq!(
        settle(&mut order, std::slice::from_ref(&rejected)),
        WorkOrderStage::AtencionRequerida
    );

    // Una nueva cotización enviada regresa la orden a espera de aprobación
    let resent = quote(
        &order,
        QuoteStatus::Enviado,
        vec![item("Reparación de clutch", 4_200, false)],
    );
    assert_eq!(
        settle(&mut order, &[rejected, resent]),
        WorkOrderStage::EsperaAprobacion
    );
}

#[test]
fn cancelled_order_ignores_quote_activity() {
    let mut order = with_diagnostic(new_order());
    order.stage = WorkOrderStage::Cancelado;
    order.status = WorkOrderStatus::Cancelado;

    let approved = quote(
        &order,
        QuoteStatus::Aprobado,
        vec![item("Afinación mayor", 3_000, false)],
    );
    assert_eq!(
        settle(&mut order, std::slice::from_ref(&approved)),
        WorkOrderStage::Cancelado
    );
    assert_eq!(order.status, WorkOrderStatus::Cancelado);
}

#[test]
fn totals_are_derived_per_line() {
    let items = vec![
        QuoteItem {
            discount_percent: Decimal::from(10),
            ..item("Cambio de aceite", 1_000, false)
        },
        item("Filtro de aire", 350, false),
    ];
    let totals = compute_totals(&items);

    // 1000 con 10% de descuento + 350, IVA 16% por partida
    assert_eq!(totals.subtotal, Decimal::new(1_250_00, 2));
    assert_eq!(totals.tax_amount, Decimal::new(200_00, 2));
    assert_eq!(totals.total, Decimal::new(1_450_00, 2));
}

#[test]
fn quality_checklist_summary_round_trips() {
    let records: Vec<QualityCheckRecord> = QUALITY_CHECKLIST
        .iter()
        .enumerate()
        .map(|(i, def)| QualityCheckRecord {
            id: def.id.to_string(),
            description: def.description.to_string(),
            category: def.category.to_string(),
            status: if i == 0 {
                QualityCheckStatus::NoAplica
            } else {
                QualityCheckStatus::Ok
            },
            notes: if i == 1 {
                Some("Ajuste menor realizado".to_string())
            } else {
                None
            },
        })
        .collect();

    let summary = encode_checklist_summary(&records);
    let parsed = parse_checklist_summary(&summary).unwrap();

    assert_eq!(parsed.len(), QUALITY_CHECKLIST.len());
    assert_eq!(parsed[0].status, QualityCheckStatus::NoAplica);
    assert_eq!(parsed[1].notes.as_deref(), Some("Ajuste menor realizado"));
    assert_eq!(parsed, records);
}

#[test]
fn history_entries_serialize_in_report_format() {
    let entry = HistoryEntry::new(WorkOrderStage::EsperaAprobacion, "asesor", "Cotización enviada");
    let value = serde_json::to_value(&entry).unwrap();

    assert_eq!(value["stage"], "Esperando Aprobación");
    assert_eq!(value["user"], "asesor");
    // Los campos opcionales ausentes no aparecen en el JSON
    assert!(value.get("qualityChecksData").is_none());
    assert!(value.get("checklistSummary").is_none());
}
