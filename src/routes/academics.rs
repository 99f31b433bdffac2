use actix_web::web;

use super::masters::{configure_master, no_extra};
use crate::services::masters::resources::{
    Classes, GradeSubjectMappings, Hostels, Sections, Students, SubjectGrades, Villages,
};

// 配置路由
pub fn configure_academics_routes(cfg: &mut web::ServiceConfig) {
    configure_master::<Classes>(cfg, no_extra);
    configure_master::<Sections>(cfg, no_extra);
    configure_master::<Hostels>(cfg, no_extra);
    configure_master::<Villages>(cfg, no_extra);
    configure_master::<SubjectGrades>(cfg, no_extra);
    configure_master::<GradeSubjectMappings>(cfg, no_extra);
    configure_master::<Students>(cfg, no_extra);
}
