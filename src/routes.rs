use crate::{
    api::{dispen, izin, presensi, rekap},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/presensi")
                    // /presensi/tap — must come before the {siswa_id} matcher
                    .service(web::resource("/tap").route(web::post().to(presensi::tap_rfid)))
                    // /presensi/{siswa_id}
                    .service(
                        web::resource("/{siswa_id}").route(web::post().to(presensi::presensi)),
                    )
                    // /presensi/{siswa_id}/status
                    .service(
                        web::resource("/{siswa_id}/status")
                            .route(web::get().to(presensi::today_status)),
                    ),
            )
            .service(
                web::scope("/izin")
                    // /izin
                    .service(web::resource("").route(web::post().to(izin::create_izin)))
                    // /izin/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(izin::approve_izin)),
                    )
                    // /izin/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(izin::reject_izin)),
                    ),
            )
            .service(
                web::scope("/dispen")
                    // /dispen
                    .service(web::resource("").route(web::post().to(dispen::create_dispen)))
                    // /dispen/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(dispen::approve_dispen)),
                    )
                    // /dispen/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(dispen::reject_dispen)),
                    ),
            )
            .service(
                web::scope("/rekap")
                    // /rekap/{kelas_id}
                    .service(
                        web::resource("/{kelas_id}").route(web::get().to(rekap::class_summary)),
                    ),
            ),
    );
}
