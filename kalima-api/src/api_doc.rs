use utoipa::OpenApi;

use crate::openapi::{
    AutocompleteResponse, Entry, ErrorBody, LookupOutcome, RootFamily, SearchOutcome, Suggestion,
    UsageExample, VerbForm,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Kalima", description = "Arabic-Russian dictionary lookup"),
    paths(
        crate::health,
        crate::info,
        crate::search_entries,
        crate::entries_by_root,
        crate::autocomplete,
        crate::lookup
    ),
    components(
        schemas(
            Entry, VerbForm, UsageExample, SearchOutcome, RootFamily, LookupOutcome,
            Suggestion, AutocompleteResponse, ErrorBody
        )
    ),
    tags(
        (name = "dictionary", description = "Search, root family and autocomplete lookups"),
        (name = "service", description = "Health and runtime information")
    )
)]
pub struct ApiDoc;
