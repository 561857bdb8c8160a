//! OpenAPI description of the generic endpoints, one document per resource.
//!
//! The generic handlers cannot carry `#[utoipa::path]`, so the operations
//! are assembled with the `utoipa::openapi` builders and merged by the
//! application:
//!
//! ```ignore
//! let mut doc = base_document();
//! doc.merge(resource_openapi::<Brand>("/api"));
//! doc.merge(resource_openapi::<Product>("/api"));
//! ```

use axum_helpers::{Message, PaginationMeta};
use utoipa::openapi::{
    OpenApi, OpenApiBuilder, RefOr, Required,
    content::ContentBuilder,
    path::{
        HttpMethod, Operation, OperationBuilder, Parameter, ParameterBuilder, ParameterIn,
        PathItemBuilder, PathsBuilder,
    },
    request_body::RequestBodyBuilder,
    response::{Response, ResponseBuilder},
    schema::{
        ArrayBuilder, ComponentsBuilder, KnownFormat, ObjectBuilder, Ref, Schema, SchemaFormat,
        Type,
    },
    tag::TagBuilder,
};
use utoipa::{IntoParams, PartialSchema, ToSchema};

use crate::pagination::PaginationQuery;
use crate::resource::Resource;

const JSON: &str = "application/json";

fn schema_ref<S: ToSchema>() -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(S::name()))
}

fn string_schema() -> ObjectBuilder {
    ObjectBuilder::new().schema_type(Type::String)
}

/// `{ success, message, data, meta?, timestamp }` with `data` typed.
fn envelope(data: RefOr<Schema>, with_meta: bool) -> RefOr<Schema> {
    let mut object = ObjectBuilder::new()
        .property("success", ObjectBuilder::new().schema_type(Type::Boolean))
        .required("success")
        .property("message", schema_ref::<Message>())
        .property("data", data)
        .property(
            "timestamp",
            string_schema().format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime))),
        )
        .required("timestamp");
    if with_meta {
        object = object.property("meta", schema_ref::<PaginationMeta>());
    }
    RefOr::T(Schema::Object(object.build()))
}

fn json_response(description: &str, schema: RefOr<Schema>) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content(JSON, ContentBuilder::new().schema(Some(schema)).build())
        .build()
}

fn failure(description: &str) -> Response {
    json_response(
        description,
        RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .property("success", ObjectBuilder::new().schema_type(Type::Boolean))
                .property("message", schema_ref::<Message>())
                .property("timestamp", string_schema())
                .build(),
        )),
    )
}

fn id_parameter(name: &str) -> Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .description(Some(format!("{name} id (24 hex characters)")))
        .schema(Some(string_schema()))
        .build()
}

fn operation(tag: &str, id: String, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tags(Some(vec![tag.to_string()]))
        .operation_id(Some(id))
        .summary(Some(summary))
        .response("400", failure("Validation failed or malformed request"))
        .response("408", failure("Request timed out"))
        .response("429", failure("Rate limit exceeded"))
        .response("500", failure("Internal server error"))
}

fn with_body<S: ToSchema>(builder: OperationBuilder) -> OperationBuilder {
    builder.request_body(Some(
        RequestBodyBuilder::new()
            .content(JSON, ContentBuilder::new().schema(Some(schema_ref::<S>())).build())
            .required(Some(Required::True))
            .build(),
    ))
}

/// Paths, schemas and tag for the endpoints of `T` mounted at `prefix + T::URL`.
pub fn resource_openapi<T>(prefix: &str) -> OpenApi
where
    T: Resource + ToSchema,
    T::Create: ToSchema,
    T::Update: ToSchema,
{
    let name = T::NAME;
    let key = T::COLLECTION;
    let entity = schema_ref::<T>();

    let create: Operation = with_body::<T::Create>(operation(
        T::TAG,
        format!("create_{key}"),
        format!("Create a {name}"),
    ))
    .response("201", json_response(&format!("{name} created"), envelope(entity.clone(), false)))
    .response("409", failure("Duplicate value for a unique field"))
    .build();

    let list: Operation = operation(T::TAG, format!("list_{key}"), format!("List {key}"))
        .parameters(Some(PaginationQuery::into_params(|| Some(ParameterIn::Query))))
        .response(
            "200",
            json_response(
                "One page of results",
                envelope(ArrayBuilder::new().items(entity.clone()).into(), true),
            ),
        )
        .build();

    let find_one: Operation = operation(T::TAG, format!("get_{key}"), format!("Get a {name} by id"))
        .parameter(id_parameter(name))
        .response("200", json_response(&format!("{name} found"), envelope(entity.clone(), false)))
        .response("404", failure(&format!("{name} not found")))
        .build();

    let update = |method: &str| -> Operation {
        with_body::<T::Update>(operation(
            T::TAG,
            format!("{method}_{key}"),
            format!("Update a {name}"),
        ))
        .parameter(id_parameter(name))
        .response("200", json_response(&format!("{name} updated"), envelope(entity.clone(), false)))
        .response("404", failure(&format!("{name} not found")))
        .response("409", failure("Duplicate value for a unique field"))
        .build()
    };

    let remove: Operation = operation(T::TAG, format!("delete_{key}"), format!("Delete a {name}"))
        .parameter(id_parameter(name))
        .response(
            "200",
            json_response(
                &format!("{name} removed"),
                envelope(
                    ObjectBuilder::new()
                        .property("id", string_schema())
                        .required("id")
                        .into(),
                    false,
                ),
            ),
        )
        .response("404", failure(&format!("{name} not found")))
        .build();

    let collection_path = format!("{prefix}{}", T::URL);
    let item_path = format!("{prefix}{}", T::url_with_id());

    let paths = PathsBuilder::new()
        .path(
            collection_path,
            PathItemBuilder::new()
                .operation(HttpMethod::Post, create)
                .operation(HttpMethod::Get, list)
                .build(),
        )
        .path(
            item_path,
            PathItemBuilder::new()
                .operation(HttpMethod::Get, find_one)
                .operation(HttpMethod::Patch, update("patch"))
                .operation(HttpMethod::Put, update("put"))
                .operation(HttpMethod::Delete, remove)
                .build(),
        )
        .build();

    let mut schemas = vec![
        (<T as ToSchema>::name().into_owned(), T::schema()),
        (<T::Create as ToSchema>::name().into_owned(), <T::Create as PartialSchema>::schema()),
        (<T::Update as ToSchema>::name().into_owned(), <T::Update as PartialSchema>::schema()),
        (Message::name().into_owned(), Message::schema()),
        (PaginationMeta::name().into_owned(), PaginationMeta::schema()),
    ];
    <T as ToSchema>::schemas(&mut schemas);
    <T::Create as ToSchema>::schemas(&mut schemas);
    <T::Update as ToSchema>::schemas(&mut schemas);

    OpenApiBuilder::new()
        .paths(paths)
        .components(Some(ComponentsBuilder::new().schemas_from_iter(schemas).build()))
        .tags(Some(vec![
            TagBuilder::new()
                .name(T::TAG)
                .description(Some(format!("{name} management")))
                .build(),
        ]))
        .build()
}
