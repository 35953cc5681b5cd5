// Dweve SDMX - Structural Metadata Engine
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Streaming scan of maintainable identities
//!
//! Listing responses (`/codelist/SPC/CL_GEO/all`) can be large while only
//! the `id`/`agencyID`/`version` triples matter for version resolution.
//! The scanner reads them with `quick-xml` events without building a DOM.

use crate::error::Result;
use crate::parser::DEFAULT_VERSION;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sdmx_core::reference::{StructureRef, StructureType, Version};

/// Every maintainable declared in `xml`, in document order.
///
/// References inside structures (`<Ref>`, attachment wrappers) carry no
/// `agencyID`/`id` pair on the element itself and are skipped.
pub fn scan_artefacts(xml: &str) -> Result<Vec<StructureRef>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut found = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if let Some(reference) = artefact(&e)? {
                    found.push(reference);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(found)
}

/// Versions of the artefact `reference` names (version ignored) declared in
/// `xml`.
pub fn scan_versions(xml: &str, reference: &StructureRef) -> Result<Vec<Version>> {
    Ok(scan_artefacts(xml)?
        .into_iter()
        .filter(|found| found.same_artefact(reference))
        .map(|found| found.version)
        .collect())
}

fn artefact(element: &BytesStart) -> Result<Option<StructureRef>> {
    let local = element.local_name();
    let Ok(class) = std::str::from_utf8(local.as_ref()) else {
        return Ok(None);
    };
    let structure_type = match StructureType::from_class(class) {
        Some(t) if t.class_name() == class => t,
        _ => return Ok(None),
    };

    let (mut id, mut agency, mut version) = (None, None, None);
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        match attr.key.local_name().as_ref() {
            b"id" => id = Some(attr.unescape_value()?.into_owned()),
            b"agencyID" => agency = Some(attr.unescape_value()?.into_owned()),
            b"version" => version = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    Ok(match (agency, id) {
        (Some(agency), Some(id)) => Some(StructureRef::new(
            structure_type,
            agency,
            id,
            version.as_deref().unwrap_or(DEFAULT_VERSION),
        )),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_GEO" agencyID="SPC" version="1.0"><str:Code id="TO"/></str:Codelist>
      <str:Codelist id="CL_GEO" agencyID="SPC" version="2.0"/>
      <str:Codelist id="CL_SEX" agencyID="SPC" version="1.0"/>
    </str:Codelists>
    <str:Constraints>
      <str:ContentConstraint id="CR_X" agencyID="SPC" version="1.0">
        <str:ConstraintAttachment><str:Dataflow><Ref id="DF_X" agencyID="SPC" version="1.0"/></str:Dataflow></str:ConstraintAttachment>
      </str:ContentConstraint>
    </str:Constraints>
  </mes:Structures>
</mes:Structure>"#;

    #[test]
    fn test_scan_lists_maintainables_only() {
        let found = scan_artefacts(LISTING).unwrap();
        let ids: Vec<_> = found.iter().map(|r| (r.id.as_str(), r.version.as_str())).collect();
        assert_eq!(
            ids,
            vec![("CL_GEO", "1.0"), ("CL_GEO", "2.0"), ("CL_SEX", "1.0"), ("CR_X", "1.0")]
        );
        assert_eq!(found[3].structure_type, StructureType::ContentConstraint);
    }

    #[test]
    fn test_scan_versions_of_one_artefact() {
        let target = StructureRef::latest(StructureType::Codelist, "SPC", "CL_GEO");
        let versions = scan_versions(LISTING, &target).unwrap();
        assert_eq!(versions, vec![Version::parse("1.0"), Version::parse("2.0")]);
    }

    #[test]
    fn test_scan_malformed() {
        assert!(scan_artefacts("<a><b></a>").is_err());
    }
}
