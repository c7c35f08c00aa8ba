/// Constant values related to the Open Packaging Convention.

/// Member name of the content type map
pub const CONTENT_TYPES_MEMBER: &str = "[Content_Types].xml";

/// Member name of the package-level relationships
pub const PACKAGE_RELS_MEMBER: &str = "_rels/.rels";

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    /// Main part of a `.docx`
    pub const WML_DOCUMENT_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    /// Main part of a `.dotx`
    pub const WML_TEMPLATE_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";
    /// Main part of a `.docm`
    pub const WML_DOCUMENT_MACRO_MAIN: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";
    /// Main part of a `.dotm`
    pub const WML_TEMPLATE_MACRO_MAIN: &str = "application/vnd.ms-word.template.macroEnabledTemplate.main+xml";

    /// Content types accepted as a WordprocessingML main document part.
    pub const WML_MAIN_PARTS: [&str; 4] = [
        WML_DOCUMENT_MAIN,
        WML_TEMPLATE_MAIN,
        WML_DOCUMENT_MACRO_MAIN,
        WML_TEMPLATE_MACRO_MAIN,
    ];
}

/// XML namespace URIs used in OPC packages
pub mod namespace {
    /// WordprocessingML main namespace
    pub const WML_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., hyperlinks to external URLs)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in OPC packages
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Strict OOXML variant of [`OFFICE_DOCUMENT`]
    pub const OFFICE_DOCUMENT_STRICT: &str = "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";
}
