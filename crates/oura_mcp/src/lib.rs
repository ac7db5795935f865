//! MCP server exposing the Oura root resolver as tools.
//!
//! Each collection gets three tools: `<collection>_one`, `<collection>_page`
//! (date-window paging with a continuation) and `<collection>_range` (the
//! API's own `next_token` paging). `status` and `configure` manage the token.

use std::sync::Arc;

use rmcp::Json;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use oura_client::{
    Collection, CollectionResolver, DailyRecord, ItemRef, PageRequest, RangeQuery, Root,
};

mod error;

pub use error::{McpError, McpResult};

/// Fallback used when the configured directives fail to parse.
pub const DEFAULT_LOG_FILTER: &str = "info,rmcp=warn";

/// Build the tracing filter from `OURA_LOG_LEVEL`, then `RUST_LOG`, then
/// `info`, with rmcp internals capped at `warn`.
pub fn log_filter(mut get: impl FnMut(&str) -> Option<String>) -> String {
    let level = ["OURA_LOG_LEVEL", "RUST_LOG"]
        .into_iter()
        .filter_map(|key| get(key))
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());
    format!("{},rmcp=warn", level)
}

#[derive(Clone)]
pub struct OuraMcpHandler {
    root: Arc<Root>,
    tool_router: rmcp::handler::server::tool::ToolRouter<OuraMcpHandler>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ConfigureParams {
    /// Personal access token from https://cloud.ouraring.com/personal-access-tokens/new
    #[serde(alias = "personalAccessToken")]
    pub personal_access_token: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct IdParam {
    pub id: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct StatusResult {
    pub status: String,
    pub ready: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ItemResult {
    /// Reference back to the `one` lookup for this item.
    pub gref: ItemRef,
    pub record: serde_json::Value,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PageResult {
    pub items: Vec<ItemResult>,
    /// Arguments for the next `_page` call; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRequest>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RangeResult {
    pub items: Vec<ItemResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

fn item_result(resolver: &CollectionResolver, record: DailyRecord) -> McpResult<ItemResult> {
    Ok(ItemResult {
        gref: resolver.gref(&record),
        record: serde_json::to_value(record)?,
    })
}

impl OuraMcpHandler {
    async fn one_item(&self, collection: Collection, id: &str) -> McpResult<ItemResult> {
        let resolver = self.root.collection(collection);
        let record = resolver.one(id).await?;
        item_result(&resolver, record)
    }

    async fn page_items(&self, collection: Collection, req: &PageRequest) -> McpResult<PageResult> {
        let resolver = self.root.collection(collection);
        let page = resolver.page(req).await?;
        let items = page
            .items
            .into_iter()
            .map(|r| item_result(&resolver, r))
            .collect::<McpResult<Vec<_>>>()?;
        Ok(PageResult {
            items,
            next: page.next,
        })
    }

    async fn range_items(&self, collection: Collection, query: &RangeQuery) -> McpResult<RangeResult> {
        let resolver = self.root.collection(collection);
        let resp = resolver.range(query).await?;
        let items = resp
            .data
            .into_iter()
            .map(|r| item_result(&resolver, r))
            .collect::<McpResult<Vec<_>>>()?;
        Ok(RangeResult {
            items,
            next_token: resp.next_token,
        })
    }
}

#[tool_router]
impl OuraMcpHandler {
    pub fn new(root: Arc<Root>) -> Self {
        Self {
            root,
            tool_router: Self::tool_router(),
        }
    }

    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    pub fn root(&self) -> &Arc<Root> {
        &self.root
    }

    #[tool(name = "status", description = "Connection status of the Oura account")]
    async fn status(&self) -> Result<Json<StatusResult>, String> {
        let status = self.root.status().await;
        Ok(Json(StatusResult {
            status: status.to_string(),
            ready: status == oura_client::Status::Ready,
        }))
    }

    #[tool(
        name = "configure",
        description = "Store the Oura personal access token used for all requests"
    )]
    async fn configure(
        &self,
        params: Parameters<ConfigureParams>,
    ) -> Result<Json<StatusResult>, String> {
        self.root.configure(params.0.personal_access_token).await;
        self.status().await
    }

    #[tool(name = "daily_sleep_one", description = "Get a daily sleep summary by id")]
    async fn daily_sleep_one(&self, params: Parameters<IdParam>) -> Result<Json<ItemResult>, String> {
        Ok(Json(self.one_item(Collection::DailySleep, &params.0.id).await?))
    }

    #[tool(
        name = "daily_sleep_page",
        description = "Page daily sleep summaries, newest window first (startDate, endDate, page, pageSize <= 10)"
    )]
    async fn daily_sleep_page(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<Json<PageResult>, String> {
        Ok(Json(self.page_items(Collection::DailySleep, &params.0).await?))
    }

    #[tool(
        name = "daily_sleep_range",
        description = "List daily sleep summaries using the API's next_token paging"
    )]
    async fn daily_sleep_range(
        &self,
        params: Parameters<RangeQuery>,
    ) -> Result<Json<RangeResult>, String> {
        Ok(Json(self.range_items(Collection::DailySleep, &params.0).await?))
    }

    #[tool(name = "daily_activity_one", description = "Get a daily activity summary by id")]
    async fn daily_activity_one(
        &self,
        params: Parameters<IdParam>,
    ) -> Result<Json<ItemResult>, String> {
        Ok(Json(self.one_item(Collection::DailyActivity, &params.0.id).await?))
    }

    #[tool(
        name = "daily_activity_page",
        description = "Page daily activity summaries, newest window first (startDate, endDate, page, pageSize <= 10)"
    )]
    async fn daily_activity_page(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<Json<PageResult>, String> {
        Ok(Json(self.page_items(Collection::DailyActivity, &params.0).await?))
    }

    #[tool(
        name = "daily_activity_range",
        description = "List daily activity summaries using the API's next_token paging"
    )]
    async fn daily_activity_range(
        &self,
        params: Parameters<RangeQuery>,
    ) -> Result<Json<RangeResult>, String> {
        Ok(Json(self.range_items(Collection::DailyActivity, &params.0).await?))
    }

    #[tool(name = "daily_readiness_one", description = "Get a daily readiness summary by id")]
    async fn daily_readiness_one(
        &self,
        params: Parameters<IdParam>,
    ) -> Result<Json<ItemResult>, String> {
        Ok(Json(self.one_item(Collection::DailyReadiness, &params.0.id).await?))
    }

    #[tool(
        name = "daily_readiness_page",
        description = "Page daily readiness summaries, newest window first (startDate, endDate, page, pageSize <= 10)"
    )]
    async fn daily_readiness_page(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<Json<PageResult>, String> {
        Ok(Json(self.page_items(Collection::DailyReadiness, &params.0).await?))
    }

    #[tool(
        name = "daily_readiness_range",
        description = "List daily readiness summaries using the API's next_token paging"
    )]
    async fn daily_readiness_range(
        &self,
        params: Parameters<RangeQuery>,
    ) -> Result<Json<RangeResult>, String> {
        Ok(Json(self.range_items(Collection::DailyReadiness, &params.0).await?))
    }

    #[tool(name = "daily_stress_one", description = "Get a daily stress summary by id")]
    async fn daily_stress_one(
        &self,
        params: Parameters<IdParam>,
    ) -> Result<Json<ItemResult>, String> {
        Ok(Json(self.one_item(Collection::DailyStress, &params.0.id).await?))
    }

    #[tool(
        name = "daily_stress_page",
        description = "Page daily stress summaries, newest window first (startDate, endDate, page, pageSize <= 10)"
    )]
    async fn daily_stress_page(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<Json<PageResult>, String> {
        Ok(Json(self.page_items(Collection::DailyStress, &params.0).await?))
    }

    #[tool(
        name = "daily_stress_range",
        description = "List daily stress summaries using the API's next_token paging"
    )]
    async fn daily_stress_range(
        &self,
        params: Parameters<RangeQuery>,
    ) -> Result<Json<RangeResult>, String> {
        Ok(Json(self.range_items(Collection::DailyStress, &params.0).await?))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for OuraMcpHandler {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
        )
        .with_instructions(
            "Oura Ring MCP server - daily sleep, activity, readiness and stress \
             summaries. Call `configure` with a personal access token first; \
             `_page` tools return `next` arguments for the following page.",
        )
    }
}
