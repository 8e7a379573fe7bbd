//! XML namespace URIs shared by the CellDesigner reader and the SBML-qual
//! writer.

pub const SBML: &str = "http://www.sbml.org/sbml/level2/version4";
pub const CD: &str = "http://www.sbml.org/2001/ns/celldesigner";
pub const SBML3: &str = "http://www.sbml.org/sbml/level3/version1/core";
pub const LAYOUT: &str = "http://www.sbml.org/sbml/level3/version1/layout/version1";
pub const QUAL: &str = "http://www.sbml.org/sbml/level3/version1/qual/version1";
pub const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const VCARD: &str = "http://www.w3.org/2001/vcard-rdf/3.0#";
pub const BQBIOL: &str = "http://biomodels.net/biology-qualifiers/";
pub const BQMODEL: &str = "http://biomodels.net/model-qualifiers/";
pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
