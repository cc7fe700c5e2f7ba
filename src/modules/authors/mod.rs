pub mod models;
pub mod service;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use catalog_db::Db;
use catalog_http::{no_content, ApiError, ApiResponse};
use catalog_kernel::{InitCtx, Migration, Module};

use crate::utils;
use models::{AuthorWithBooks, CreateAuthorRequest, ListAuthorsParams};

/// Authors module: create, list with book counts, fetch-one with books.
pub struct AuthorsModule;

impl AuthorsModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self, db: &Db) -> Router {
        Router::new()
            .route("/", get(list_authors).post(create_author))
            .route("/{author_id}", get(get_author))
            .with_state(db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors with their book counts",
                        "tags": ["Authors"],
                        "parameters": [
                            {
                                "in": "query",
                                "name": "name",
                                "schema": { "type": "string" },
                                "description": "Filter authors by name substring"
                            },
                            {
                                "in": "query",
                                "name": "order",
                                "schema": { "type": "string", "enum": ["ASC", "DESC"], "default": "DESC" },
                                "description": "Order by book count"
                            },
                            {
                                "in": "query",
                                "name": "page",
                                "schema": { "type": "integer", "default": 1 }
                            },
                            {
                                "in": "query",
                                "name": "limit",
                                "schema": { "type": "integer", "default": 10 }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Authors retrieved successfully",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "msg": { "type": "string" },
                                                "data": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/AuthorListItem" }
                                                },
                                                "pagination": { "$ref": "#/components/schemas/Pagination" }
                                            }
                                        }
                                    }
                                }
                            },
                            "204": { "description": "No authors in the list yet" }
                        }
                    },
                    "post": {
                        "summary": "Create a new author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateAuthor" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Author created successfully",
                                "content": {
                                    "application/json": {
                                        "example": { "msg": "Author created successfully" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "409": {
                                "description": "Author with this email already exists",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{author_id}": {
                    "get": {
                        "summary": "Get a single author with their books",
                        "tags": ["Authors"],
                        "parameters": [
                            {
                                "in": "path",
                                "name": "author_id",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Author retrieved successfully",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "msg": { "type": "string" },
                                                "data": { "$ref": "#/components/schemas/AuthorWithBooks" }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Author not found",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "CreateAuthor": {
                        "type": "object",
                        "required": ["name", "email"],
                        "properties": {
                            "name": { "type": "string", "minLength": 2 },
                            "email": { "type": "string", "format": "email" }
                        }
                    },
                    "AuthorListItem": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "email": { "type": "string" },
                            "created_at": { "type": "string" },
                            "books_count": { "type": "integer" }
                        }
                    },
                    "AuthorWithBooks": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "email": { "type": "string" },
                            "created_at": { "type": "string" },
                            "books": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "id": { "type": "integer" },
                                        "title": { "type": "string" },
                                        "isbn": { "type": "string" },
                                        "published_year": { "type": "integer", "nullable": true },
                                        "created_at": { "type": "string" }
                                    }
                                }
                            }
                        }
                    },
                    "Pagination": {
                        "type": "object",
                        "properties": {
                            "page": { "type": "integer" },
                            "limit": { "type": "integer" },
                            "count": { "type": "integer" }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_authors",
            up: "CREATE TABLE IF NOT EXISTS authors (\
                    id INTEGER PRIMARY KEY AUTOINCREMENT, \
                    name TEXT NOT NULL, \
                    email TEXT UNIQUE NOT NULL, \
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP\
                )",
        }]
    }
}

async fn create_author(
    State(db): State<Db>,
    Json(request): Json<CreateAuthorRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    let name = utils::author_name(request.name.as_deref())?;
    let email = utils::email(request.email.as_deref())?;

    service::create_author(&db, &name, &email).await?;
    Ok(ApiResponse::message("Author created successfully"))
}

async fn list_authors(
    State(db): State<Db>,
    Query(params): Query<ListAuthorsParams>,
) -> Result<Response, ApiError> {
    let (rows, pagination) = service::list_authors(&db, &params).await?;

    if rows.is_empty() {
        return Ok(no_content());
    }

    Ok(ApiResponse::with_pagination("Authors retrieved successfully", rows, pagination)
        .into_response())
}

async fn get_author(
    State(db): State<Db>,
    Path(author_id): Path<i64>,
) -> Result<ApiResponse<AuthorWithBooks>, ApiError> {
    let author = service::get_author(&db, author_id).await?;
    Ok(ApiResponse::with_data(
        "Author retrieved successfully",
        author,
    ))
}

/// Create a new instance of the authors module.
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new())
}
