// src/settings.rs

//! Settings documents for the installed tool
//!
//! OpenTAP reads its authentication tokens and package repositories from XML
//! files under `<install dir>/Settings`. The generators here are pure: they
//! turn the configured repositories into a document string and leave writing
//! it to the caller.
//!
//! The `type` attributes name the tool's own settings classes and must be
//! reproduced verbatim.

use crate::error::{Error, Result};
use crate::repository::Repository;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

/// File name of the authentication settings document
pub const AUTHENTICATION_SETTINGS_FILE: &str = "AuthenticationSettings.xml";

/// File name of the package manager settings document
pub const PACKAGE_MANAGER_SETTINGS_FILE: &str = "Package Manager.xml";

const AUTHENTICATION_SETTINGS_TYPE: &str = "OpenTap.Authentication.AuthenticationSettings";
const TOKEN_INFO_TYPE: &str = "OpenTap.Authentication.TokenInfo";
const PACKAGE_MANAGER_SETTINGS_TYPE: &str = "OpenTap.Package.PackageManagerSettings";
const REPOSITORY_ENTRY_TYPE: &str = "OpenTap.Package.RepositorySettingEntry";

/// Indenting XML writer over an in-memory buffer
struct SettingsWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl SettingsWriter {
    fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| Error::SettingsError(e.to_string()))?;
        Ok(Self { writer })
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::SettingsError(e.to_string()))
    }

    fn start(&mut self, name: &str, type_name: Option<&str>) -> Result<()> {
        let mut start = BytesStart::new(name);
        if let Some(type_name) = type_name {
            start.push_attribute(("type", type_name));
        }
        self.event(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, value: &str) -> Result<()> {
        self.start(name, None)?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.end(name)
    }

    fn empty_element(&mut self, name: &str) -> Result<()> {
        self.event(Event::Empty(BytesStart::new(name)))
    }

    fn finish(self) -> Result<String> {
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| Error::SettingsError(e.to_string()))
    }
}

/// Build the authentication settings document
///
/// One `TokenInfo` per repository with a token; repositories without one
/// are skipped. With no tokens at all the document has an empty `Tokens`
/// list, so callers only write it when at least one token exists.
pub fn authentication_settings(repositories: &[Repository]) -> Result<String> {
    write_authentication_settings(repositories, |token| token)
}

/// The authentication settings document with every access token masked
///
/// Built from placeholders rather than by searching the real document, so
/// tokens are hidden whatever characters they contain.
pub fn redacted_authentication_settings(repositories: &[Repository]) -> Result<String> {
    write_authentication_settings(repositories, |_| REDACTED)
}

/// Placeholder shown instead of an access token
const REDACTED: &str = "***";

fn write_authentication_settings<'a>(
    repositories: &'a [Repository],
    access_token: impl Fn(&'a str) -> &'a str,
) -> Result<String> {
    let mut w = SettingsWriter::new()?;
    w.start("AuthenticationSettings", Some(AUTHENTICATION_SETTINGS_TYPE))?;
    w.start("Tokens", None)?;

    for repo in repositories {
        let Some(token) = repo.token() else {
            continue;
        };
        w.start("TokenInfo", Some(TOKEN_INFO_TYPE))?;
        w.text_element("AccessToken", access_token(token))?;
        w.empty_element("RefreshToken")?;
        w.text_element("Domain", repo.domain())?;
        w.end("TokenInfo")?;
    }

    w.end("Tokens")?;
    w.end("AuthenticationSettings")?;
    w.finish()
}

/// Build the package manager settings document
///
/// Every repository is listed and enabled, in the order given.
pub fn package_manager_settings(repositories: &[Repository]) -> Result<String> {
    let mut w = SettingsWriter::new()?;
    w.start("PackageManagerSettings", Some(PACKAGE_MANAGER_SETTINGS_TYPE))?;
    w.start("Repositories", None)?;

    for repo in repositories {
        w.start("RepositorySettingEntry", Some(REPOSITORY_ENTRY_TYPE))?;
        w.text_element("IsEnabled", "true")?;
        w.text_element("Url", repo.url())?;
        w.end("RepositorySettingEntry")?;
    }

    w.end("Repositories")?;
    w.text_element("UseLocalPackageCache", "true")?;
    w.text_element("ShowIncompatiblePackages", "false")?;
    w.text_element("CheckForUpdates", "false")?;
    w.end("PackageManagerSettings")?;
    w.finish()
}
