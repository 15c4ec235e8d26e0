//! Collection-level handlers.

use docdesk_core::{build_filter, Descriptor, DocumentPage, Filter, PageRequest, ValueType};
use docdesk_engine::{mutation, query, Gateway};

use crate::convert::convert_result;
use crate::{DeskConfig, Output, Result};

/// Filter fields of a FindDocuments command.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindArgs<'a> {
    /// Field to compare
    pub field: Option<&'a str>,
    /// Raw comparison value
    pub value: Option<&'a str>,
    /// Interpretation of `value`
    pub value_type: Option<ValueType>,
}

/// Handle CollectionInfo command.
pub fn collection_info(
    gateway: &Gateway,
    config: &DeskConfig,
    uri: &Descriptor,
    database: &str,
    collection: &str,
    page: Option<PageRequest>,
) -> Result<Output> {
    if let Some(page) = &page {
        convert_result(page.validate(config.max_page_size))?;
    }
    let (stats, documents) = convert_result(gateway.with_connection(uri, |conn| {
        let stats = query::collection_stats(conn, database, collection)?;
        let documents = match page {
            Some(page) => query::find(
                conn,
                database,
                collection,
                &Filter::all(),
                page,
                config.query_options(),
            )?,
            None => query::find_all(conn, database, collection, config.page_order())?,
        };
        Ok((stats, documents))
    }))?;
    Ok(page_output(stats, documents))
}

/// Handle FindDocuments command.
pub fn find_documents(
    gateway: &Gateway,
    config: &DeskConfig,
    uri: &Descriptor,
    database: &str,
    collection: &str,
    args: FindArgs<'_>,
    page: PageRequest,
) -> Result<Output> {
    convert_result(page.validate(config.max_page_size))?;
    let filter = convert_result(build_filter(
        args.field,
        args.value,
        args.value_type.unwrap_or_default(),
    ))?;
    let (stats, documents) = convert_result(gateway.with_connection(uri, |conn| {
        let stats = query::collection_stats(conn, database, collection)?;
        let documents = query::find(
            conn,
            database,
            collection,
            &filter,
            page,
            config.query_options(),
        )?;
        Ok((stats, documents))
    }))?;
    Ok(page_output(stats, documents))
}

/// Handle NewCollection command.
pub fn new_collection(
    gateway: &Gateway,
    uri: &Descriptor,
    database: &str,
    collection: &str,
) -> Result<Output> {
    convert_result(gateway.with_connection(uri, |conn| {
        mutation::create_collection(conn, database, collection)
    }))?;
    Ok(Output::Unit)
}

/// Handle DropCollection command.
pub fn drop_collection(
    gateway: &Gateway,
    uri: &Descriptor,
    database: &str,
    collection: &str,
) -> Result<Output> {
    convert_result(gateway.with_connection(uri, |conn| {
        mutation::drop_collection(conn, database, collection)
    }))?;
    Ok(Output::Unit)
}

fn page_output(stats: docdesk_core::Document, page: DocumentPage) -> Output {
    Output::DocumentPage {
        collection_stats: stats,
        documents_total_count: page.total,
        documents: page.documents,
    }
}
