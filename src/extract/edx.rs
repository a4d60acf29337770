use super::{Page, Pass, og_title_image, set, str_at};
use crate::metadata::CertificateMetadata;

pub(super) const PASSES: &[Pass] = &[og_title_image, json_ld, default_issuer];

fn json_ld(page: &Page<'_>, meta: &mut CertificateMetadata) {
    for block in page.json_ld_of_type("EducationalOccupationalCredential") {
        set(&mut meta.name, str_at(block, "/name"));
        set(&mut meta.description, str_at(block, "/description"));
        set(
            &mut meta.issuer,
            str_at(block, "/issuedBy/name").or_else(|| str_at(block, "/provider/name")),
        );
        set(
            &mut meta.completion_date,
            str_at(block, "/dateCreated").or_else(|| str_at(block, "/dateIssued")),
        );
    }
}

fn default_issuer(_: &Page<'_>, meta: &mut CertificateMetadata) {
    meta.issuer.get_or_insert_with(|| "edX".to_string());
}
