//! Azure Files REST response types.

use serde::Deserialize;

use crate::error::Result;
use crate::share::DirectoryListing;

/// Body of a `List Directories and Files` response.
#[derive(Debug, Deserialize)]
#[serde(rename = "EnumerationResults")]
pub struct EnumerationResults {
    #[serde(rename = "Entries", default)]
    pub entries: Entries,

    #[serde(rename = "NextMarker", default)]
    pub next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Entries {
    #[serde(rename = "$value", default)]
    pub items: Vec<Entry>,
}

/// A single listing entry, in the order the service returned it.
#[derive(Debug, Deserialize)]
pub enum Entry {
    File(FileEntry),
    Directory(DirectoryEntry),
}

#[derive(Debug, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Properties", default)]
    pub properties: Option<FileProperties>,
}

#[derive(Debug, Deserialize)]
pub struct FileProperties {
    #[serde(rename = "Content-Length", default)]
    pub content_length: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "Name")]
    pub name: String,
}

impl EnumerationResults {
    /// Parse a listing page from its XML body.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    /// Continuation marker for the next page, if any.
    pub fn continuation(&self) -> Option<&str> {
        self.next_marker
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Split the entries into directory and file names.
    pub fn into_listing(self) -> DirectoryListing {
        let mut listing = DirectoryListing::default();
        for entry in self.entries.items {
            match entry {
                Entry::Directory(d) => listing.directories.push(d.name),
                Entry::File(f) => listing.files.push(f.name),
            }
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ServiceEndpoint="https://myaccount.file.core.windows.net/" ShareName="backups" DirectoryPath="photos">
  <Marker>string-value</Marker>
  <MaxResults>100</MaxResults>
  <Entries>
    <File>
      <Name>cat.jpg</Name>
      <Properties>
        <Content-Length>2048</Content-Length>
      </Properties>
    </File>
    <Directory>
      <Name>2023</Name>
      <Properties />
    </Directory>
    <Directory>
      <Name>2024</Name>
    </Directory>
    <File>
      <Name>dog.jpg</Name>
      <Properties>
        <Content-Length>0</Content-Length>
      </Properties>
    </File>
  </Entries>
  <NextMarker>page-2</NextMarker>
</EnumerationResults>"#;

    #[test]
    fn test_parse_listing_page() {
        let page = EnumerationResults::from_xml(PAGE).unwrap();
        assert_eq!(page.continuation(), Some("page-2"));

        let listing = page.into_listing();
        assert_eq!(listing.directories, vec!["2023", "2024"]);
        assert_eq!(listing.files, vec!["cat.jpg", "dog.jpg"]);
    }

    #[test]
    fn test_parse_last_page() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ServiceEndpoint="https://myaccount.file.core.windows.net/" ShareName="backups" DirectoryPath="">
  <Entries>
    <File><Name>readme.txt</Name><Properties><Content-Length>5</Content-Length></Properties></File>
  </Entries>
  <NextMarker />
</EnumerationResults>"#;
        let page = EnumerationResults::from_xml(xml).unwrap();
        assert_eq!(page.continuation(), None);
        assert_eq!(page.into_listing().files, vec!["readme.txt"]);
    }

    #[test]
    fn test_parse_empty_directory() {
        let xml = r#"<EnumerationResults ShareName="backups" DirectoryPath="empty"><Entries /><NextMarker /></EnumerationResults>"#;
        let page = EnumerationResults::from_xml(xml).unwrap();
        assert!(page.continuation().is_none());
        assert!(page.into_listing().is_empty());
    }
}
