//! # Supabase Server
//!
//! Database tools over MCP, backed by the PostgREST API of a Supabase
//! project. Two database functions are expected on the project side:
//! `list_public_tables()` returning rows with a `table_name` column, and
//! `execute_sql(sql text)` returning the query rows as JSON.
//!
//! Row-returning tools answer with `{"data": ...}`.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, schemars, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::infrastructure::supabase::{
    SupabaseClient, SupabaseError, eq_filters, ilike_filter, is_identifier,
};

pub const NAME: &str = "SupabaseTools";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SqlRequest {
    #[schemars(description = "SQL statement to execute")]
    pub sql: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InsertRowRequest {
    pub table: String,
    #[schemars(description = "Column values of the new row")]
    pub row: Map<String, Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BulkInsertRequest {
    pub table: String,
    #[schemars(description = "Non-empty list of rows to insert")]
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRequest {
    pub table: String,
    #[schemars(description = "Equality criteria selecting the rows to update")]
    pub r#match: Map<String, Value>,
    #[schemars(description = "New column values")]
    pub values: Map<String, Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRequest {
    pub table: String,
    #[schemars(description = "Equality criteria selecting the rows to delete")]
    pub r#match: Map<String, Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TableRequest {
    pub table: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SampleRequest {
    pub table: String,
    #[serde(default = "default_sample_limit")]
    #[schemars(description = "Number of rows to sample (default 5)")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    pub table: String,
    pub column: String,
    #[schemars(description = "Substring to look for, case-insensitive")]
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

fn default_sample_limit() -> u32 {
    5
}

fn default_search_limit() -> u32 {
    10
}

#[derive(Clone)]
pub struct SupabaseTools {
    client: SupabaseClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SupabaseTools {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Build from `SUPABASE_URL` and `SUPABASE_KEY`.
    pub fn from_env() -> Result<Self, SupabaseError> {
        Ok(Self::new(SupabaseClient::from_env()?))
    }

    #[tool(description = "List all tables in the public schema of the Supabase database.")]
    async fn list_tables(&self) -> Result<CallToolResult, McpError> {
        let rows = self
            .client
            .rpc("list_public_tables", json!({}))
            .await
            .map_err(internal)?;
        let tables: Vec<String> = rows
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row.get("table_name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        payload(json!({ "tables": tables }))
    }

    #[tool(description = "Run an arbitrary SQL query on the Supabase database.")]
    async fn run_sql(
        &self,
        Parameters(SqlRequest { sql }): Parameters<SqlRequest>,
    ) -> Result<CallToolResult, McpError> {
        if sql.trim().is_empty() {
            return Err(McpError::invalid_params("SQL query must not be empty.", None));
        }
        debug!(sql = %sql, "run_sql");
        let data = self
            .client
            .rpc("execute_sql", json!({ "sql": sql }))
            .await
            .map_err(internal)?;
        rows(data)
    }

    #[tool(description = "Insert a row into a Supabase table.")]
    async fn insert_row(
        &self,
        Parameters(InsertRowRequest { table, row }): Parameters<InsertRowRequest>,
    ) -> Result<CallToolResult, McpError> {
        let data = self
            .client
            .insert(&table, Value::Object(row))
            .await
            .map_err(internal)?;
        rows(data)
    }

    #[tool(description = "Insert multiple rows into a Supabase table.")]
    async fn bulk_insert(
        &self,
        Parameters(BulkInsertRequest { table, rows: new_rows }): Parameters<BulkInsertRequest>,
    ) -> Result<CallToolResult, McpError> {
        if new_rows.is_empty() {
            return Err(McpError::invalid_params(
                "Rows must be a non-empty list of dictionaries.",
                None,
            ));
        }
        let batch = Value::Array(new_rows.into_iter().map(Value::Object).collect());
        let data = self.client.insert(&table, batch).await.map_err(internal)?;
        rows(data)
    }

    #[tool(description = "Update rows in a Supabase table matching criteria.")]
    async fn update_row(
        &self,
        Parameters(request): Parameters<UpdateRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.update(request).await
    }

    #[tool(description = "Update multiple rows in a Supabase table matching criteria. Values must not be empty.")]
    async fn bulk_update(
        &self,
        Parameters(request): Parameters<UpdateRequest>,
    ) -> Result<CallToolResult, McpError> {
        if request.values.is_empty() {
            return Err(McpError::invalid_params(
                "Values must be a non-empty dictionary.",
                None,
            ));
        }
        self.update(request).await
    }

    #[tool(description = "Delete rows from a Supabase table matching criteria.")]
    async fn delete_row(
        &self,
        Parameters(DeleteRequest { table, r#match }): Parameters<DeleteRequest>,
    ) -> Result<CallToolResult, McpError> {
        let data = self.client.delete(&table, &r#match).await.map_err(internal)?;
        rows(data)
    }

    #[tool(description = "Get the schema (column names and data types) of a table.")]
    async fn get_table_schema(
        &self,
        Parameters(TableRequest { table }): Parameters<TableRequest>,
    ) -> Result<CallToolResult, McpError> {
        if !is_identifier(&table) {
            return payload(json!({ "error": "Invalid table name." }));
        }

        let sql = format!(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = '{table}'"
        );
        let data = match self.client.rpc("execute_sql", json!({ "sql": sql })).await {
            Ok(data) => data,
            Err(e) => {
                warn!(table = %table, error = %e, "schema lookup failed");
                return payload(json!({ "error": format!("Error executing SQL: {e}") }));
            }
        };

        let columns: Vec<Value> = match data.as_array() {
            Some(columns) if !columns.is_empty() => columns
                .iter()
                .map(|col| {
                    json!({
                        "column_name": col.get("column_name").cloned().unwrap_or(Value::Null),
                        "data_type": col.get("data_type").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect(),
            _ => {
                return payload(json!({ "error": format!("No schema found for table '{table}'.") }));
            }
        };
        payload(json!({ "data": columns }))
    }

    #[tool(description = "Get the number of rows in a table.")]
    async fn get_row_count(
        &self,
        Parameters(TableRequest { table }): Parameters<TableRequest>,
    ) -> Result<CallToolResult, McpError> {
        if !is_identifier(&table) {
            return Err(McpError::invalid_params("Invalid table name.", None));
        }
        let sql = format!("SELECT COUNT(*) as count FROM {table}");
        let data = self
            .client
            .rpc("execute_sql", json!({ "sql": sql }))
            .await
            .map_err(internal)?;
        let count = data
            .as_array()
            .and_then(|rows| rows.first())
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Ok(CallToolResult::success(vec![Content::text(count.to_string())]))
    }

    #[tool(description = "Get a sample of rows from a table (default 5).")]
    async fn get_table_sample(
        &self,
        Parameters(SampleRequest { table, limit }): Parameters<SampleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let data = self
            .client
            .select(&table, &[], Some(limit))
            .await
            .map_err(internal)?;
        rows(data)
    }

    #[tool(description = "Search for rows where a column contains a query string (case-insensitive).")]
    async fn search_rows(
        &self,
        Parameters(SearchRequest {
            table,
            column,
            query,
            limit,
        }): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        if column.trim().is_empty() {
            return Err(McpError::invalid_params(
                "Column must be a non-empty string.",
                None,
            ));
        }
        let data = self
            .client
            .select(&table, &[ilike_filter(&column, &query)], Some(limit))
            .await
            .map_err(internal)?;
        rows(data)
    }
}

impl SupabaseTools {
    async fn update(&self, request: UpdateRequest) -> Result<CallToolResult, McpError> {
        debug!(table = %request.table, filters = ?eq_filters(&request.r#match), "update");
        let data = self
            .client
            .update(&request.table, &request.r#match, &request.values)
            .await
            .map_err(internal)?;
        rows(data)
    }
}

#[tool_handler]
impl ServerHandler for SupabaseTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tools to inspect and modify a Supabase database: list tables, run SQL, \
                 insert, update, delete and search rows."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn internal(err: SupabaseError) -> McpError {
    match err {
        SupabaseError::InvalidTable(_) => McpError::invalid_params(err.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

fn rows(data: Value) -> Result<CallToolResult, McpError> {
    payload(json!({ "data": data }))
}

fn payload(value: Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::json(value)?]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn json_of(result: &CallToolResult) -> Value {
        match &result.content[0].raw {
            RawContent::Text(t) => serde_json::from_str(&t.text).unwrap(),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    async fn tools() -> (MockServer, SupabaseTools) {
        let server = MockServer::start().await;
        let tools = SupabaseTools::new(SupabaseClient::new(&server.uri(), "key"));
        (server, tools)
    }

    #[test]
    fn test_advertises_all_tools() {
        let names: Vec<String> = SupabaseTools::tool_router()
            .list_all()
            .into_iter()
            .map(|t| t.name.into_owned())
            .collect();
        for expected in [
            "list_tables",
            "run_sql",
            "insert_row",
            "bulk_insert",
            "update_row",
            "bulk_update",
            "delete_row",
            "get_table_schema",
            "get_row_count",
            "get_table_sample",
            "search_rows",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn test_list_tables() {
        let (server, tools) = tools().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/list_public_tables"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"table_name": "users"}, {"table_name": "posts"}])),
            )
            .mount(&server)
            .await;

        let result = tools.list_tables().await.unwrap();
        assert_eq!(json_of(&result), json!({"tables": ["users", "posts"]}));
    }

    #[tokio::test]
    async fn test_run_sql_rejects_blank_query() {
        let (_server, tools) = tools().await;
        let err = tools
            .run_sql(Parameters(SqlRequest { sql: "   ".into() }))
            .await
            .unwrap_err();
        assert_eq!(err.message, "SQL query must not be empty.");
    }

    #[tokio::test]
    async fn test_run_sql_wraps_rows() {
        let (server, tools) = tools().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/execute_sql"))
            .and(body_json(json!({"sql": "select 1 as one"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"one": 1}])))
            .mount(&server)
            .await;

        let result = tools
            .run_sql(Parameters(SqlRequest {
                sql: "select 1 as one".into(),
            }))
            .await
            .unwrap();
        assert_eq!(json_of(&result), json!({"data": [{"one": 1}]}));
    }

    #[tokio::test]
    async fn test_bulk_validation() {
        let (_server, tools) = tools().await;
        let err = tools
            .bulk_insert(Parameters(BulkInsertRequest {
                table: "users".into(),
                rows: Vec::new(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Rows must be a non-empty list of dictionaries.");

        let err = tools
            .bulk_update(Parameters(UpdateRequest {
                table: "users".into(),
                r#match: map(json!({"id": 1})),
                values: Map::new(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Values must be a non-empty dictionary.");
    }

    #[tokio::test]
    async fn test_delete_row_filters_by_match() {
        let (server, tools) = tools().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/users"))
            .and(query_param("id", "eq.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 9}])))
            .expect(1)
            .mount(&server)
            .await;

        let result = tools
            .delete_row(Parameters(DeleteRequest {
                table: "users".into(),
                r#match: map(json!({"id": 9})),
            }))
            .await
            .unwrap();
        assert_eq!(json_of(&result), json!({"data": [{"id": 9}]}));
    }

    #[tokio::test]
    async fn test_table_schema_reports_errors_in_payload() {
        let (server, tools) = tools().await;
        let result = tools
            .get_table_schema(Parameters(TableRequest {
                table: "users;--".into(),
            }))
            .await
            .unwrap();
        assert_eq!(json_of(&result), json!({"error": "Invalid table name."}));

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/execute_sql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        let result = tools
            .get_table_schema(Parameters(TableRequest {
                table: "ghosts".into(),
            }))
            .await
            .unwrap();
        assert_eq!(
            json_of(&result),
            json!({"error": "No schema found for table 'ghosts'."})
        );
    }

    #[tokio::test]
    async fn test_table_schema_columns() {
        let (server, tools) = tools().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/execute_sql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"column_name": "id", "data_type": "bigint", "ordinal_position": 1},
                {"column_name": "email", "data_type": "text", "ordinal_position": 2}
            ])))
            .mount(&server)
            .await;

        let result = tools
            .get_table_schema(Parameters(TableRequest {
                table: "users".into(),
            }))
            .await
            .unwrap();
        assert_eq!(
            json_of(&result),
            json!({"data": [
                {"column_name": "id", "data_type": "bigint"},
                {"column_name": "email", "data_type": "text"}
            ]})
        );
    }

    #[tokio::test]
    async fn test_row_count() {
        let (server, tools) = tools().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/execute_sql"))
            .and(body_json(json!({"sql": "SELECT COUNT(*) as count FROM users"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"count": 42}])))
            .mount(&server)
            .await;

        let result = tools
            .get_row_count(Parameters(TableRequest {
                table: "users".into(),
            }))
            .await
            .unwrap();
        match &result.content[0].raw {
            RawContent::Text(t) => assert_eq!(t.text, "42"),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_rows_uses_ilike_and_default_limit() {
        let (server, tools) = tools().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/posts"))
            .and(query_param("title", "ilike.*rust*"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let request: SearchRequest =
            serde_json::from_value(json!({"table": "posts", "column": "title", "query": "rust"}))
                .unwrap();
        assert_eq!(request.limit, 10);
        let result = tools.search_rows(Parameters(request)).await.unwrap();
        assert_eq!(json_of(&result), json!({"data": [{"id": 1}]}));
    }

    #[tokio::test]
    async fn test_row_tools_reject_path_like_table_names() {
        let (_server, tools) = tools().await;
        let err = tools
            .insert_row(Parameters(InsertRowRequest {
                table: "x/../rpc/execute_sql".into(),
                row: map(json!({"sql": "drop table users"})),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Invalid table name"));
    }

    #[tokio::test]
    async fn test_api_failure_is_internal_error() {
        let (server, tools) = tools().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "bad table"})))
            .mount(&server)
            .await;

        let err = tools
            .get_table_sample(Parameters(SampleRequest {
                table: "nope".into(),
                limit: 5,
            }))
            .await
            .unwrap_err();
        assert!(err.message.contains("bad table"));
    }
}
