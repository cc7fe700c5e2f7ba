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
use models::{BookDetailRow, CreateBookRequest, ListBooksParams, UpdateBookRequest};

/// Books module: create, list with author names, fetch-one, partial update.
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, db: &Db) -> Router {
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route("/{id}", get(get_book).put(update_book))
            .with_state(db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books along with their author's name",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "in": "query",
                                "name": "title",
                                "schema": { "type": "string" },
                                "description": "Filter books by title substring"
                            },
                            {
                                "in": "query",
                                "name": "year",
                                "schema": { "type": "integer" },
                                "description": "Filter books by exact published year"
                            },
                            {
                                "in": "query",
                                "name": "author",
                                "schema": { "type": "string" },
                                "description": "Filter books by author name substring"
                            },
                            {
                                "in": "query",
                                "name": "sort",
                                "schema": {
                                    "type": "string",
                                    "enum": ["title", "published_year", "created_at"]
                                },
                                "description": "Sort field; unknown values leave the order unspecified"
                            },
                            {
                                "in": "query",
                                "name": "order",
                                "schema": { "type": "string", "enum": ["ASC", "DESC"], "default": "DESC" }
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
                                "description": "Books retrieved successfully",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "msg": { "type": "string" },
                                                "data": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/BookListItem" }
                                                },
                                                "pagination": { "$ref": "#/components/schemas/Pagination" }
                                            }
                                        }
                                    }
                                }
                            },
                            "204": { "description": "No books in the list yet" },
                            "400": {
                                "description": "Validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a new book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Book created successfully",
                                "content": {
                                    "application/json": {
                                        "example": { "msg": "Book created successfully" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure or unknown author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "409": {
                                "description": "Book with this isbn already exists",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a single book with its author details",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "in": "path",
                                "name": "id",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Book retrieved successfully",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "msg": { "type": "string" },
                                                "data": { "$ref": "#/components/schemas/BookDetail" }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Update one or more fields of a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "in": "path",
                                "name": "id",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Book updated successfully",
                                "content": {
                                    "application/json": {
                                        "example": { "msg": "Book updated successfully" }
                                    }
                                }
                            },
                            "400": {
                                "description": "No fields supplied or no such book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "409": {
                                "description": "Book with this isbn already exists",
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
                    "CreateBook": {
                        "type": "object",
                        "required": ["title", "isbn", "author_id"],
                        "properties": {
                            "title": { "type": "string", "example": "Harry Potter" },
                            "isbn": {
                                "type": "string",
                                "example": "1234567890",
                                "description": "Must be a 10 digit unique string"
                            },
                            "published_year": { "type": "integer", "example": 1997 },
                            "author_id": { "type": "integer", "example": 1 }
                        }
                    },
                    "UpdateBook": {
                        "type": "object",
                        "description": "At least one field must be provided",
                        "properties": {
                            "title": { "type": "string" },
                            "isbn": { "type": "string" },
                            "published_year": { "type": "integer" },
                            "author_id": { "type": "integer" }
                        }
                    },
                    "BookListItem": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "isbn": { "type": "string" },
                            "published_year": { "type": "integer", "nullable": true },
                            "author_id": { "type": "integer" },
                            "created_at": { "type": "string" },
                            "author": { "type": "string" }
                        }
                    },
                    "BookDetail": {
                        "type": "object",
                        "properties": {
                            "author_id": { "type": "integer" },
                            "name": { "type": "string" },
                            "email": { "type": "string" },
                            "author_created_at": { "type": "string" },
                            "book_id": { "type": "integer" },
                            "title": { "type": "string" },
                            "isbn": { "type": "string" },
                            "published_year": { "type": "integer", "nullable": true },
                            "book_created_at": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: "CREATE TABLE IF NOT EXISTS books (\
                    id INTEGER PRIMARY KEY AUTOINCREMENT, \
                    title TEXT NOT NULL, \
                    isbn TEXT UNIQUE NOT NULL, \
                    published_year INTEGER, \
                    author_id INTEGER NOT NULL, \
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP, \
                    FOREIGN KEY (author_id) REFERENCES authors(id)\
                )",
        }]
    }
}

async fn create_book(
    State(db): State<Db>,
    Json(request): Json<CreateBookRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    let title = utils::book_title(request.title.as_deref())?;
    let isbn = utils::isbn(request.isbn.as_deref())?;
    let published_year = utils::published_year(request.published_year)?;
    let author_id = utils::author_id(request.author_id)?;

    service::create_book(&db, &title, &isbn, published_year, author_id).await?;
    Ok(ApiResponse::message("Book created successfully"))
}

async fn list_books(
    State(db): State<Db>,
    Query(params): Query<ListBooksParams>,
) -> Result<Response, ApiError> {
    let year = utils::year_filter(params.year.as_deref())?;
    let (rows, pagination) = service::list_books(&db, &params, year).await?;

    if rows.is_empty() {
        return Ok(no_content());
    }

    Ok(ApiResponse::with_pagination("Books retrieved successfully", rows, pagination)
        .into_response())
}

async fn get_book(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<BookDetailRow>, ApiError> {
    let detail = service::get_book(&db, id).await?;
    Ok(ApiResponse::with_data("Book retrieved successfully", detail))
}

async fn update_book(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    let request = UpdateBookRequest {
        title: request
            .title
            .as_deref()
            .map(|t| utils::book_title(Some(t)))
            .transpose()?,
        isbn: request
            .isbn
            .as_deref()
            .map(|i| utils::isbn(Some(i)))
            .transpose()?,
        published_year: utils::published_year(request.published_year)?,
        author_id: request
            .author_id
            .map(|id| utils::author_id(Some(id)))
            .transpose()?,
    };

    service::update_book(&db, id, &request).await?;
    Ok(ApiResponse::message("Book updated successfully"))
}

/// Create a new instance of the books module.
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
