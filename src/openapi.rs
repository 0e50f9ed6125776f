use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MRP API",
        version = "0.1.0",
        description = r#"
Material requirements planning service for a manufacturing ERP dashboard.

Reads pre-fetched JSON snapshots of the ERP's Bill of Material detail and
item/stock tables, and serves multi-level BOM explosion, shortfall analysis,
and purchase requisition drafting on top of them.
        "#
    ),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::bom::explode_bom,
        crate::handlers::bom::shortfall,
        crate::handlers::bom::direct_components,
        crate::handlers::items::list_items,
        crate::handlers::requisitions::create_requisition,
        crate::handlers::requisitions::get_requisition,
        crate::handlers::requisitions::list_requisitions,
        crate::handlers::snapshots::snapshot_status,
        crate::handlers::snapshots::reload_snapshots,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::models::BomEdge,
        crate::models::ItemRecord,
        crate::services::bom_explosion::ExplosionLine,
        crate::services::bom_explosion::ExplosionReport,
        crate::services::bom_explosion::MissingComponentWarning,
        crate::services::bom_explosion::RequisitionCandidate,
        crate::services::requisition::Requisition,
        crate::services::requisition::RequisitionLine,
        crate::handlers::bom::ExplodeRequest,
        crate::handlers::bom::DirectComponentRow,
        crate::handlers::requisitions::CreateRequisitionRequest,
        crate::handlers::requisitions::RequisitionLineRequest,
        crate::handlers::health::HealthResponse,
        crate::snapshots::SnapshotSummary,
    )),
    tags(
        (name = "bom", description = "BOM explosion and shortfall analysis"),
        (name = "items", description = "Item snapshot listings"),
        (name = "requisitions", description = "Purchase requisition drafts"),
        (name = "snapshots", description = "Snapshot administration"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
