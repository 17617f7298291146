//! Contact directory lookups
//!
//! A small set of messages is answered straight from the staff directory
//! instead of the catalog or the model: anything naming the founder, the
//! general manager, or asking for contact details in general.

use crate::config::{ContactEntry, ContactsSection};

/// A single person in the directory
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

impl From<&ContactEntry> for Contact {
    fn from(entry: &ContactEntry) -> Self {
        Self {
            name: entry.name.clone(),
            email: entry.email.clone(),
            phone: entry.phone.clone(),
            role: entry.role.clone(),
        }
    }
}

/// The staff directory consulted for contact questions
#[derive(Debug, Clone, PartialEq)]
pub struct ContactDirectory {
    pub founder: Contact,
    pub general_manager: Contact,
}

impl Default for ContactDirectory {
    fn default() -> Self {
        Self {
            founder: Contact {
                name: "Divya Khandal".to_string(),
                email: "divz333@gmail.com".to_string(),
                phone: "9166167005".to_string(),
                role: "Founder".to_string(),
            },
            general_manager: Contact {
                name: "Mr. Maan Singh".to_string(),
                email: "mansinghr4@gmail.com".to_string(),
                phone: "9829854896".to_string(),
                role: "General Manager".to_string(),
            },
        }
    }
}

impl ContactDirectory {
    /// Build the directory, applying any configured overrides to the built-ins
    pub fn from_config(section: Option<&ContactsSection>) -> Self {
        let mut directory = Self::default();
        if let Some(section) = section {
            if let Some(entry) = &section.founder {
                directory.founder = Contact::from(entry);
            }
            if let Some(entry) = &section.general_manager {
                directory.general_manager = Contact::from(entry);
            }
        }
        directory
    }

    /// Answer a contact question, if the message is one
    ///
    /// Keyword groups are checked in order; the founder takes precedence when
    /// a message mentions several people. "gm" matches as a plain substring,
    /// so words containing it (like "gmail") also trigger the GM block.
    pub fn lookup(&self, message: &str) -> Option<String> {
        let msg = message.to_lowercase();

        if msg.contains("founder") || msg.contains("divya") {
            Some(format!(
                "👩‍💼 Founder: {}\n📧 {}\n📞 {}",
                self.founder.name, self.founder.email, self.founder.phone
            ))
        } else if msg.contains("general manager") || msg.contains("maan singh") || msg.contains("gm")
        {
            Some(format!(
                "👨‍💼 GM: {}\n📧 {}\n📞 {}",
                self.general_manager.name, self.general_manager.email, self.general_manager.phone
            ))
        } else if msg.contains("contact") {
            Some(format!(
                "📞 Founder: {} | GM: {}\n📧 Emails: {}, {}",
                self.founder.phone,
                self.general_manager.phone,
                self.founder.email,
                self.general_manager.email
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founder_block_format() {
        let directory = ContactDirectory::default();
        let answer = directory.lookup("Who is the founder?").unwrap();
        assert_eq!(
            answer,
            "👩‍💼 Founder: Divya Khandal\n📧 divz333@gmail.com\n📞 9166167005"
        );
    }

    #[test]
    fn test_founder_matched_by_name() {
        let directory = ContactDirectory::default();
        let answer = directory.lookup("can I talk to Divya").unwrap();
        assert!(answer.contains("Divya Khandal"));
    }

    #[test]
    fn test_gm_block_format() {
        let directory = ContactDirectory::default();
        let answer = directory.lookup("phone of the general manager please").unwrap();
        assert_eq!(
            answer,
            "👨‍💼 GM: Mr. Maan Singh\n📧 mansinghr4@gmail.com\n📞 9829854896"
        );
    }

    #[test]
    fn test_gm_short_keyword() {
        let directory = ContactDirectory::default();
        assert!(directory.lookup("gm number?").is_some());
    }

    #[test]
    fn test_gm_keyword_matches_inside_words() {
        // Substring semantics: "gmail" contains "gm"
        let directory = ContactDirectory::default();
        let answer = directory.lookup("do you have a gmail id").unwrap();
        assert!(answer.starts_with("👨‍💼 GM:"));
    }

    #[test]
    fn test_generic_contact_summary() {
        let directory = ContactDirectory::default();
        let answer = directory.lookup("how do I contact you").unwrap();
        assert_eq!(
            answer,
            "📞 Founder: 9166167005 | GM: 9829854896\n📧 Emails: divz333@gmail.com, mansinghr4@gmail.com"
        );
    }

    #[test]
    fn test_founder_wins_over_gm_and_contact() {
        let directory = ContactDirectory::default();
        let answer = directory
            .lookup("contact details of founder and general manager")
            .unwrap();
        assert!(answer.starts_with("👩‍💼 Founder:"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let directory = ContactDirectory::default();
        assert!(directory.lookup("FOUNDER?").is_some());
        assert!(directory.lookup("Contact INFO").is_some());
    }

    #[test]
    fn test_unrelated_message_returns_none() {
        let directory = ContactDirectory::default();
        assert!(directory.lookup("do you sell scarves").is_none());
    }

    #[test]
    fn test_config_override_replaces_entry() {
        let section = ContactsSection {
            founder: Some(ContactEntry {
                name: "New Founder".to_string(),
                email: "founder@example.com".to_string(),
                phone: "9000000000".to_string(),
                role: "Founder".to_string(),
            }),
            general_manager: None,
        };

        let directory = ContactDirectory::from_config(Some(&section));
        let answer = directory.lookup("founder email").unwrap();
        assert!(answer.contains("New Founder"));
        assert!(answer.contains("founder@example.com"));

        // The GM entry keeps its built-in value
        assert_eq!(
            directory.general_manager,
            ContactDirectory::default().general_manager
        );
    }

    #[test]
    fn test_no_config_section_uses_builtins() {
        let directory = ContactDirectory::from_config(None);
        assert_eq!(directory, ContactDirectory::default());
    }
}
