//! LibXML2 FFI Wrapper Module
//!
//! Safe wrappers around the libxml2 calls this crate needs:
//!
//! - parsing an XML Schema from an in-memory buffer,
//! - parsing an XML document from an in-memory buffer through a dedicated
//!   parser context, so a well-formedness failure is reported with its own
//!   message and position instead of being printed to stderr,
//! - validating a document while it is parsed, with the schema validator
//!   plugged into the parser's SAX flow and a structured error handler that
//!   writes into a collector owned by the caller, so violations found before
//!   a well-formedness error are kept,
//! - walking the element tree of a parsed document (element children,
//!   text content, unqualified attributes).
//!
//! Every libxml2 allocation is owned by exactly one RAII wrapper
//! ([`XmlSchemaPtr`], [`XmlDocument`], and the private context guards) and is
//! released on drop.
//!
//! There is no mature pure Rust XSD validator, so libxml2 stays the
//! validation engine; the FFI surface is kept to the handful of functions
//! declared below.

use std::borrow::Cow;
use std::ffi::CStr;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::sync::Once;

use libc::{c_char, c_int, c_void};

use crate::error::{LibXml2Error, LibXml2Result};

/// Global initialization flag for libxml2
///
/// libxml2's initialization functions are NOT thread-safe, so they run
/// exactly once behind `std::sync::Once`.
static LIBXML2_INIT: Once = Once::new();

/// Parser option: suppress error reports on stderr
const XML_PARSE_NOERROR: c_int = 1 << 5;
/// Parser option: suppress warning reports on stderr
const XML_PARSE_NOWARNING: c_int = 1 << 6;
/// Parser option: forbid network access while parsing (DTDs, entities)
const XML_PARSE_NONET: c_int = 1 << 11;

const DOCUMENT_PARSE_OPTIONS: c_int = XML_PARSE_NOERROR | XML_PARSE_NOWARNING | XML_PARSE_NONET;

/// `xmlErrorLevel::XML_ERR_ERROR`
const XML_ERR_ERROR: c_int = 2;

/// `xmlErrorDomain::XML_FROM_SCHEMASV`
const XML_FROM_SCHEMASV: c_int = 17;

/// `xmlElementType::XML_ELEMENT_NODE`
const XML_ELEMENT_NODE: c_int = 1;

// Opaque libxml2 structures
#[repr(C)]
pub struct XmlSchema {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaParserCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaValidCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaSAXPlugStruct {
    _private: [u8; 0],
}

/// Leading fields of libxml2's `struct _xmlParserCtxt`
///
/// Same rule as [`XmlNode`]: libxml2 allocates the full structure and only
/// these fields are touched.
#[repr(C)]
pub struct XmlParserCtxt {
    sax: *mut c_void,
    user_data: *mut c_void,
    my_doc: *mut XmlDoc,
}

#[repr(C)]
pub struct XmlDoc {
    _private: [u8; 0],
}

/// Leading fields of libxml2's `struct _xmlNode`
///
/// Only ever accessed through pointers handed out by libxml2, which
/// allocates the full structure; the trailing fields are never touched.
#[repr(C)]
#[allow(dead_code)]
pub struct XmlNode {
    _private: *mut c_void,
    node_type: c_int,
    name: *const c_char,
    children: *mut XmlNode,
    last: *mut XmlNode,
    parent: *mut XmlNode,
    next: *mut XmlNode,
    prev: *mut XmlNode,
    doc: *mut XmlDoc,
    ns: *mut c_void,
}

#[repr(C)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *const c_char,
    pub level: c_int,
    pub file: *const c_char,
    pub line: c_int,
    pub str1: *const c_char,
    pub str2: *const c_char,
    pub str3: *const c_char,
    pub int1: c_int,
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

pub type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *mut xmlError)>;

pub type XmlFreeFunc = Option<unsafe extern "C" fn(mem: *mut c_void)>;

// External libxml2 FFI declarations
#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    pub static xmlFree: XmlFreeFunc;

    pub fn xmlInitParser();
    pub fn xmlInitGlobals();

    // Schema parsing functions
    pub fn xmlSchemaNewMemParserCtxt(
        buffer: *const c_char,
        size: c_int,
    ) -> *mut XmlSchemaParserCtxt;
    pub fn xmlSchemaSetParserStructuredErrors(
        ctxt: *mut XmlSchemaParserCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlSchemaParse(ctxt: *const XmlSchemaParserCtxt) -> *mut XmlSchema;
    pub fn xmlSchemaFreeParserCtxt(ctxt: *mut XmlSchemaParserCtxt);
    pub fn xmlSchemaFree(schema: *mut XmlSchema);

    // Schema validation functions
    pub fn xmlSchemaNewValidCtxt(schema: *const XmlSchema) -> *mut XmlSchemaValidCtxt;
    pub fn xmlSchemaFreeValidCtxt(ctxt: *mut XmlSchemaValidCtxt);
    pub fn xmlSchemaSetValidStructuredErrors(
        ctxt: *mut XmlSchemaValidCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlSchemaIsValid(ctxt: *mut XmlSchemaValidCtxt) -> c_int;
    pub fn xmlSchemaSAXPlug(
        ctxt: *mut XmlSchemaValidCtxt,
        sax: *mut *mut c_void,
        user_data: *mut *mut c_void,
    ) -> *mut XmlSchemaSAXPlugStruct;
    pub fn xmlSchemaSAXUnplug(plug: *mut XmlSchemaSAXPlugStruct) -> c_int;

    // Document parsing functions
    pub fn xmlNewParserCtxt() -> *mut XmlParserCtxt;
    pub fn xmlFreeParserCtxt(ctxt: *mut XmlParserCtxt);
    pub fn xmlCtxtReadMemory(
        ctxt: *mut XmlParserCtxt,
        buffer: *const c_char,
        size: c_int,
        url: *const c_char,
        encoding: *const c_char,
        options: c_int,
    ) -> *mut XmlDoc;
    pub fn xmlCtxtGetLastError(ctx: *mut c_void) -> *const xmlError;
    pub fn xmlCreateMemoryParserCtxt(buffer: *const c_char, size: c_int) -> *mut XmlParserCtxt;
    pub fn xmlCtxtUseOptions(ctxt: *mut XmlParserCtxt, options: c_int) -> c_int;
    pub fn xmlParseDocument(ctxt: *mut XmlParserCtxt) -> c_int;
    pub fn xmlSAX2GetLineNumber(ctx: *mut c_void) -> c_int;
    pub fn xmlSAX2GetColumnNumber(ctx: *mut c_void) -> c_int;
    pub fn xmlFreeDoc(doc: *mut XmlDoc);

    // Tree access functions
    pub fn xmlDocGetRootElement(doc: *const XmlDoc) -> *mut XmlNode;
    pub fn xmlNodeGetContent(node: *const XmlNode) -> *mut c_char;
    pub fn xmlGetNoNsProp(node: *const XmlNode, name: *const c_char) -> *mut c_char;
}

/// A single error reported by libxml2 through a structured error handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredError {
    pub line: i32,
    pub column: i32,
    pub message: String,
}

impl StructuredError {
    /// Copy the interesting fields out of a libxml2 error record
    ///
    /// # Safety
    ///
    /// `error` must be null or point to a live `xmlError`.
    unsafe fn from_raw(error: *const xmlError) -> Option<Self> {
        if error.is_null() {
            return None;
        }
        let error = unsafe { &*error };
        let message = if error.message.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(error.message) }
                .to_string_lossy()
                .trim()
                .to_string()
        };

        Some(StructuredError {
            line: error.line,
            column: error.int2,
            message,
        })
    }
}

/// Callback for libxml2 to report errors (structured)
///
/// `user_data` is the `Vec<StructuredError>` owned by the call that
/// registered the handler. Warnings are dropped.
unsafe extern "C" fn structured_error_callback(user_data: *mut c_void, error: *mut xmlError) {
    if user_data.is_null() || error.is_null() {
        return;
    }
    let errors = unsafe { &mut *(user_data as *mut Vec<StructuredError>) };

    if unsafe { (*error).level } < XML_ERR_ERROR {
        return;
    }
    if let Some(reported) = unsafe { StructuredError::from_raw(error) } {
        errors.push(reported);
    }
}

/// Collector for one streaming validation
///
/// Positions are read from the parser when the event fires, since SAX
/// validation has no tree node to take them from.
struct StreamCollector {
    parser: *mut XmlParserCtxt,
    errors: Vec<StructuredError>,
}

/// Callback for validation events raised while the document is parsed
///
/// `user_data` is the `StreamCollector` owned by the validating call. Only
/// schema validity errors are kept; parser errors are read from the parser
/// context once parsing stops.
unsafe extern "C" fn stream_error_callback(user_data: *mut c_void, error: *mut xmlError) {
    if user_data.is_null() || error.is_null() {
        return;
    }
    let collector = unsafe { &mut *(user_data as *mut StreamCollector) };

    let (level, domain) = unsafe { ((*error).level, (*error).domain) };
    if level < XML_ERR_ERROR || domain != XML_FROM_SCHEMASV {
        return;
    }
    if let Some(mut reported) = unsafe { StructuredError::from_raw(error) } {
        if !collector.parser.is_null() {
            let parser = collector.parser as *mut c_void;
            reported.line = unsafe { xmlSAX2GetLineNumber(parser) };
            reported.column = unsafe { xmlSAX2GetColumnNumber(parser) };
        }
        collector.errors.push(reported);
    }
}

/// Release a string allocated by libxml2 after copying it into Rust
///
/// # Safety
///
/// `ptr` must be null or a NUL-terminated string allocated by libxml2.
unsafe fn take_xml_string(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let value = unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned();
    if let Some(free) = unsafe { xmlFree } {
        unsafe { free(ptr as *mut c_void) };
    }
    Some(value)
}

fn buffer_len(data: &[u8]) -> LibXml2Result<c_int> {
    c_int::try_from(data.len()).map_err(|_| LibXml2Error::DocumentTooLarge { size: data.len() })
}

/// Owned, parsed XML Schema
#[derive(Debug)]
pub struct XmlSchemaPtr {
    ptr: NonNull<XmlSchema>,
}

// Safety: libxml2 documentation states that xmlSchema structures are
// thread-safe for reading once parsed. See: http://xmlsoft.org/threads.html
unsafe impl Send for XmlSchemaPtr {}
unsafe impl Sync for XmlSchemaPtr {}

impl XmlSchemaPtr {
    pub(crate) fn as_ptr(&self) -> *const XmlSchema {
        self.ptr.as_ptr()
    }
}

impl Drop for XmlSchemaPtr {
    fn drop(&mut self) {
        unsafe { xmlSchemaFree(self.ptr.as_ptr()) }
    }
}

/// Owned, parsed XML document
#[derive(Debug)]
pub struct XmlDocument {
    ptr: NonNull<XmlDoc>,
}

// Safety: the document is exclusively owned and only read after parsing.
unsafe impl Send for XmlDocument {}

impl XmlDocument {
    /// The document (root) element, if the document has one
    pub fn root_element(&self) -> Option<XmlElement<'_>> {
        let root = unsafe { xmlDocGetRootElement(self.ptr.as_ptr()) };
        NonNull::new(root).map(XmlElement::new)
    }
}

impl Drop for XmlDocument {
    fn drop(&mut self) {
        unsafe { xmlFreeDoc(self.ptr.as_ptr()) }
    }
}

/// Borrowed element node of an [`XmlDocument`]
#[derive(Debug, Clone, Copy)]
pub struct XmlElement<'doc> {
    ptr: NonNull<XmlNode>,
    _doc: PhantomData<&'doc XmlDocument>,
}

impl<'doc> XmlElement<'doc> {
    fn new(ptr: NonNull<XmlNode>) -> Self {
        XmlElement {
            ptr,
            _doc: PhantomData,
        }
    }

    fn node(&self) -> &'doc XmlNode {
        // Safety: the node lives as long as the document borrowed by 'doc.
        unsafe { &*self.ptr.as_ptr() }
    }

    /// Local name of the element
    pub fn name(&self) -> Cow<'doc, str> {
        let name = self.node().name;
        if name.is_null() {
            return Cow::Borrowed("");
        }
        unsafe { CStr::from_ptr(name) }.to_string_lossy()
    }

    /// Whether the element has no namespace
    pub fn is_unqualified(&self) -> bool {
        self.node().ns.is_null()
    }

    /// Whether this is an unqualified element with the given local name
    pub fn is_named(&self, name: &str) -> bool {
        self.is_unqualified() && self.name() == name
    }

    /// Direct child elements in document order
    pub fn child_elements(&self) -> ChildElements<'doc> {
        ChildElements {
            next: self.node().children,
            _doc: PhantomData,
        }
    }

    /// Direct unqualified child elements with the given local name
    pub fn children_named(&self, name: &str) -> impl Iterator<Item = XmlElement<'doc>> {
        self.child_elements().filter(move |child| child.is_named(name))
    }

    /// First direct unqualified child element with the given local name
    pub fn first_child_named(&self, name: &str) -> Option<XmlElement<'doc>> {
        self.child_elements().find(|child| child.is_named(name))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        unsafe { take_xml_string(xmlNodeGetContent(self.ptr.as_ptr())) }.unwrap_or_default()
    }

    /// Value of the attribute with the given name and no namespace
    pub fn attribute(&self, name: &str) -> Option<String> {
        let c_name = std::ffi::CString::new(name).ok()?;
        unsafe { take_xml_string(xmlGetNoNsProp(self.ptr.as_ptr(), c_name.as_ptr())) }
    }
}

/// Iterator over the element children of a node
pub struct ChildElements<'doc> {
    next: *mut XmlNode,
    _doc: PhantomData<&'doc XmlDocument>,
}

impl<'doc> Iterator for ChildElements<'doc> {
    type Item = XmlElement<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = NonNull::new(self.next) {
            let current = unsafe { node.as_ref() };
            self.next = current.next;
            if current.node_type == XML_ELEMENT_NODE {
                return Some(XmlElement::new(node));
            }
        }
        None
    }
}

/// Outcome of validating a document while parsing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Well-formed and conforming to the schema
    Valid,
    /// Well-formed, with schema violations in document order
    Invalid { errors: Vec<StructuredError> },
    /// Parsing stopped at `cause`; `errors` holds the violations found
    /// before that point
    NotWellFormed {
        errors: Vec<StructuredError>,
        cause: StructuredError,
    },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The schema violations, in the order libxml2 reported them
    pub fn errors(&self) -> &[StructuredError] {
        match self {
            ValidationResult::Invalid { errors } | ValidationResult::NotWellFormed { errors, .. } => {
                errors
            }
            ValidationResult::Valid => &[],
        }
    }
}

struct SchemaParserGuard(*mut XmlSchemaParserCtxt);

impl Drop for SchemaParserGuard {
    fn drop(&mut self) {
        unsafe { xmlSchemaFreeParserCtxt(self.0) }
    }
}

struct ValidCtxtGuard(*mut XmlSchemaValidCtxt);

impl Drop for ValidCtxtGuard {
    fn drop(&mut self) {
        unsafe { xmlSchemaFreeValidCtxt(self.0) }
    }
}

struct ParserCtxtGuard(*mut XmlParserCtxt);

impl Drop for ParserCtxtGuard {
    fn drop(&mut self) {
        unsafe { xmlFreeParserCtxt(self.0) }
    }
}

/// Parser context driven by hand; also frees the tree the SAX2 handlers built
struct StreamParserGuard(*mut XmlParserCtxt);

impl Drop for StreamParserGuard {
    fn drop(&mut self) {
        unsafe {
            let doc = (*self.0).my_doc;
            if !doc.is_null() {
                xmlFreeDoc(doc);
            }
            xmlFreeParserCtxt(self.0);
        }
    }
}

struct SaxPlugGuard(*mut XmlSchemaSAXPlugStruct);

impl Drop for SaxPlugGuard {
    fn drop(&mut self) {
        unsafe { xmlSchemaSAXUnplug(self.0) };
    }
}

/// LibXML2 wrapper providing safe access to the parsing and validation calls
pub struct LibXml2Wrapper {
    _phantom: PhantomData<()>,
}

impl LibXml2Wrapper {
    /// Create a new LibXML2 wrapper instance
    ///
    /// Initializes libxml2 on first use; safe to call any number of times.
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| unsafe {
            xmlInitParser();
            xmlInitGlobals();
        });

        LibXml2Wrapper {
            _phantom: PhantomData,
        }
    }

    /// Parse an XML schema from memory buffer
    ///
    /// # Errors
    ///
    /// Returns `LibXml2Error::SchemaParseFailed` carrying libxml2's messages
    /// if the buffer is not well-formed XML or not a usable schema.
    pub fn parse_schema_from_memory(&self, schema_data: &[u8]) -> LibXml2Result<XmlSchemaPtr> {
        let size = buffer_len(schema_data)?;
        let mut errors: Vec<StructuredError> = Vec::new();

        let schema_ptr = unsafe {
            let parser_ctxt = xmlSchemaNewMemParserCtxt(schema_data.as_ptr() as *const c_char, size);
            if parser_ctxt.is_null() {
                return Err(LibXml2Error::SchemaParseFailed {
                    details: "could not create schema parser context".to_string(),
                });
            }
            let guard = SchemaParserGuard(parser_ctxt);

            xmlSchemaSetParserStructuredErrors(
                guard.0,
                Some(structured_error_callback),
                &mut errors as *mut Vec<StructuredError> as *mut c_void,
            );

            xmlSchemaParse(guard.0)
        };

        match NonNull::new(schema_ptr) {
            Some(ptr) => Ok(XmlSchemaPtr { ptr }),
            None => {
                let details = if errors.is_empty() {
                    "schema could not be compiled".to_string()
                } else {
                    errors
                        .iter()
                        .map(|e| e.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; ")
                };
                Err(LibXml2Error::SchemaParseFailed { details })
            }
        }
    }

    /// Parse an XML document from memory buffer
    ///
    /// Parsing stops at the first well-formedness error, which is returned
    /// as `LibXml2Error::NotWellFormed` with its line and column.
    pub fn parse_document(&self, xml_data: &[u8]) -> LibXml2Result<XmlDocument> {
        let size = buffer_len(xml_data)?;

        unsafe {
            let parser_ctxt = xmlNewParserCtxt();
            if parser_ctxt.is_null() {
                return Err(LibXml2Error::ParserContextCreationFailed);
            }
            let guard = ParserCtxtGuard(parser_ctxt);

            let doc = xmlCtxtReadMemory(
                guard.0,
                xml_data.as_ptr() as *const c_char,
                size,
                ptr::null(),
                ptr::null(),
                DOCUMENT_PARSE_OPTIONS,
            );

            match NonNull::new(doc) {
                Some(ptr) => Ok(XmlDocument { ptr }),
                None => {
                    let last = StructuredError::from_raw(xmlCtxtGetLastError(guard.0 as *mut c_void));
                    Err(not_well_formed(last))
                }
            }
        }
    }

    /// Validate a document against a schema while parsing it
    ///
    /// Violations are collected as the parser advances. If the document
    /// turns out not to be well-formed, the violations found up to that point
    /// are returned together with the parse error. Each call registers its
    /// own collector on a fresh validation context, so nothing reported here
    /// outlives the call.
    pub fn validate_stream(
        &self,
        schema: &XmlSchemaPtr,
        xml_data: &[u8],
    ) -> LibXml2Result<ValidationResult> {
        if xml_data.is_empty() {
            return Ok(ValidationResult::NotWellFormed {
                errors: Vec::new(),
                cause: fatal_error(None),
            });
        }
        let size = buffer_len(xml_data)?;

        unsafe {
            let parser_ctxt = xmlCreateMemoryParserCtxt(xml_data.as_ptr() as *const c_char, size);
            if parser_ctxt.is_null() {
                return Err(LibXml2Error::ParserContextCreationFailed);
            }
            let parser = StreamParserGuard(parser_ctxt);
            // Options rewrite the SAX handler, so they go in before the plug.
            xmlCtxtUseOptions(parser.0, DOCUMENT_PARSE_OPTIONS);

            let valid_ctxt = xmlSchemaNewValidCtxt(schema.as_ptr());
            if valid_ctxt.is_null() {
                return Err(LibXml2Error::ValidationContextCreationFailed);
            }
            let validator = ValidCtxtGuard(valid_ctxt);

            let mut collector = StreamCollector {
                parser: parser.0,
                errors: Vec::new(),
            };
            xmlSchemaSetValidStructuredErrors(
                validator.0,
                Some(stream_error_callback),
                &mut collector as *mut StreamCollector as *mut c_void,
            );

            let plug = xmlSchemaSAXPlug(
                validator.0,
                ptr::addr_of_mut!((*parser.0).sax),
                ptr::addr_of_mut!((*parser.0).user_data),
            );
            if plug.is_null() {
                return Err(LibXml2Error::ValidationContextCreationFailed);
            }
            let plug = SaxPlugGuard(plug);

            let parse_code = xmlParseDocument(parser.0);
            let schema_valid = xmlSchemaIsValid(validator.0) == 1;
            drop(plug);

            let errors = std::mem::take(&mut collector.errors);
            if parse_code != 0 {
                let last = StructuredError::from_raw(xmlCtxtGetLastError(parser.0 as *mut c_void));
                return Ok(ValidationResult::NotWellFormed {
                    errors,
                    cause: fatal_error(last),
                });
            }

            if schema_valid && errors.is_empty() {
                Ok(ValidationResult::Valid)
            } else {
                Ok(ValidationResult::Invalid { errors })
            }
        }
    }
}

/// The parse error that stopped the parser, with its position in the message
fn fatal_error(last: Option<StructuredError>) -> StructuredError {
    match last {
        Some(error) if !error.message.is_empty() => StructuredError {
            message: format!(
                "{} Line {}, position {}.",
                error.message, error.line, error.column
            ),
            ..error
        },
        _ => StructuredError {
            line: 0,
            column: 0,
            message: "Document is not well-formed.".to_string(),
        },
    }
}

fn not_well_formed(last: Option<StructuredError>) -> LibXml2Error {
    let cause = fatal_error(last);
    LibXml2Error::NotWellFormed {
        message: cause.message,
        line: cause.line,
        column: cause.column,
    }
}

impl Default for LibXml2Wrapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="root">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="item" type="xs:integer" maxOccurs="unbounded"/>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
</xs:schema>"#;

    const VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
    <item>1</item>
    <item>2</item>
</root>"#;

    const INVALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
    <item>one</item>
</root>"#;

    #[test]
    fn test_schema_parsing_success() {
        let wrapper = LibXml2Wrapper::new();
        let result = wrapper.parse_schema_from_memory(SIMPLE_XSD.as_bytes());
        assert!(result.is_ok());
    }

    #[test]
    fn test_schema_parsing_invalid_schema() {
        let wrapper = LibXml2Wrapper::new();
        let result = wrapper.parse_schema_from_memory(b"<invalid>not a schema</invalid>");

        match result.unwrap_err() {
            LibXml2Error::SchemaParseFailed { details } => assert!(!details.is_empty()),
            other => panic!("Expected SchemaParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_parsing_empty_data() {
        let wrapper = LibXml2Wrapper::new();
        assert!(wrapper.parse_schema_from_memory(&[]).is_err());
    }

    #[test]
    fn test_validate_stream() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();

        let result = wrapper
            .validate_stream(&schema, VALID_XML.as_bytes())
            .unwrap();
        assert!(result.is_valid());
        assert!(result.errors().is_empty());

        let result = wrapper
            .validate_stream(&schema, INVALID_XML.as_bytes())
            .unwrap();
        assert!(matches!(result, ValidationResult::Invalid { .. }));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].line, 3);
        assert!(result.errors()[0].column > 1);
        assert!(result.errors()[0].message.contains("item"));
    }

    #[test]
    fn test_errors_do_not_leak_between_validations() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();

        let result = wrapper
            .validate_stream(&schema, INVALID_XML.as_bytes())
            .unwrap();
        assert!(!result.is_valid());

        let result = wrapper
            .validate_stream(&schema, VALID_XML.as_bytes())
            .unwrap();
        assert_eq!(result, ValidationResult::Valid);
    }

    #[test]
    fn test_validate_stream_stops_at_parse_error() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();

        let result = wrapper
            .validate_stream(&schema, b"<root>\n  <item>one</item>\n  <item>2</root>")
            .unwrap();

        match result {
            ValidationResult::NotWellFormed { errors, cause } => {
                assert!(!errors.is_empty());
                assert_eq!(errors[0].line, 2);
                assert_eq!(cause.line, 3);
                assert!(cause.message.contains("Line 3"));
            }
            other => panic!("Expected NotWellFormed, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_stream_reports_lines_past_node_limit() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();

        let mut xml = String::from("<root>\n");
        for i in 0..70_000 {
            xml.push_str(&format!("<item>{}</item>\n", i));
        }
        xml.push_str("<item>late</item>\n</root>");

        let result = wrapper.validate_stream(&schema, xml.as_bytes()).unwrap();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].line, 70_002);
    }

    #[test]
    fn test_validate_stream_empty_document() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();

        let result = wrapper.validate_stream(&schema, &[]).unwrap();
        assert!(matches!(result, ValidationResult::NotWellFormed { .. }));
    }

    #[test]
    fn test_parse_document_not_well_formed() {
        let wrapper = LibXml2Wrapper::new();
        let result = wrapper.parse_document(b"<root>\n  <item>1</root>");

        match result.unwrap_err() {
            LibXml2Error::NotWellFormed { message, line, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("Line 2"));
            }
            other => panic!("Expected NotWellFormed, got {:?}", other),
        }
    }

    #[test]
    fn test_tree_walk() {
        let wrapper = LibXml2Wrapper::new();
        let doc = wrapper
            .parse_document(
                br#"<root a="1" b=""><x>one</x><!-- note --><y>two</y>text<x>three</x></root>"#,
            )
            .unwrap();
        let root = doc.root_element().unwrap();

        assert_eq!(root.name(), "root");
        assert_eq!(root.attribute("a").as_deref(), Some("1"));
        assert_eq!(root.attribute("b").as_deref(), Some(""));
        assert_eq!(root.attribute("c"), None);

        let names: Vec<String> = root
            .child_elements()
            .map(|e| e.name().into_owned())
            .collect();
        assert_eq!(names, vec!["x", "y", "x"]);

        let xs: Vec<String> = root.children_named("x").map(|e| e.text_content()).collect();
        assert_eq!(xs, vec!["one", "three"]);
        assert_eq!(
            root.first_child_named("y").map(|e| e.text_content()),
            Some("two".to_string())
        );
        assert!(root.first_child_named("z").is_none());
    }

    #[test]
    fn test_namespaced_elements_are_not_unqualified() {
        let wrapper = LibXml2Wrapper::new();
        let doc = wrapper
            .parse_document(br#"<root xmlns="urn:example"><x/></root>"#)
            .unwrap();
        let root = doc.root_element().unwrap();

        assert!(!root.is_unqualified());
        assert!(root.first_child_named("x").is_none());
    }
}
