//! Merchant directory: known merchant names per category, matched in both
//! directions, and coarse fallback patterns for anything the keyword table
//! leaves unmatched.

use std::sync::LazyLock;

use cuentas_core::text::fold;

/// Details shorter than this never match as a fragment of a merchant name.
const MIN_FRAGMENT: usize = 4;

const MERCHANTS: &[(&str, &[&str])] = &[
    (
        "Alimentación",
        &[
            "CREPES Y WAFFLES", "CREPES Y WAFFLES WTC", "Crepes & Waffles", "Crepes y Waffles",
            "Crepes y Waffles WTC", "R06 CREPESYWAFFLES WTC", "R28 CREPESYWAFFLES USA",
            "R34 CREPESYWAFFLES ATL", "HAMBURGUESAS EL CORR", "HAMBURGUESAS EL CORRAL",
            "Hamburguesas El Corral", "KIOSKO EL CORRAL", "EL CORRAL GOURMET SALI",
            "EL CORRAL GREEN OFFICE", "BURGER BAR BY EL CORRA", "MC DONALD S", "WENDY S",
            "DOMINO S PIZZA", "PICARA PIZZA", "AUNTIE ANNE S", "RANDY S", "OSK PERU COCINA NIKKEI",
            "OSAKI 93", "OSAKI USAQUEN", "Osaki Chía", "KO ASIAN KITCHEN UNICE",
            "IZAKAYA ZONA T 3P", "MASTER WOK - ROCKINGHA", "SIPOTE BURRITO SALITRE", "CUMBIA HOUSE",
            "CHONA HOUSE", "RESTAURANTE CACTUS", "RESTAURANTE DI LUCCA", "RESTAURANTE EL TAMBO",
            "RESTAURANTE HARRY SASS", "PARMESSANO REST DELICA", "DELIHOUSE",
            "NEXTFOOD COLOMBIA SAS", "OLIVIA SALITRE", "SEMOLINA", "SEMOLINA CHIA", "Semolina Chia",
            "BROT APICE", "BUKE ARTESANOS DEL PAN", "LOS HORNITOS PASTEL PA", "HORNITOS AMERICAS",
            "EL HORNO DE MIKAELA", "PASTELITOSS", "GODO BURGER", "VOODOO", "NECTARIA",
            "PERCIMÓN BOGOTA 93", "PERCIMÓN TESORO", "El Maná Coffee and Brunch",
            "ROSES CAFE BAR RESTAUR", "HISTORIA DE AMOR", "COTIZA LONGANIZA BOGOT",
            "SALCHICHAS ALEMANAS", "PUEBLITO BOYACENSE P", "RIBBERA", "CRECIMIENTO GASTRONO",
            "BON BONITE ANDINO", "LES AMIS BIZCOCHERIA C", "YANUBA CALLE 122", "HELADERIA HEC",
            "BERRY LAB", "AMMAZZA AMSTERDAM", "AREA FOUR RESTAURANT", "BLACK BEAR RESTAURANT",
            "FORT NASSAU REST.", "SALONIKI - HARVARD S", "JUAN VALDEZ", "JUAN VALDEZ WORLD TRAD",
            "Juan Valdez Gran Estación", "JV COFFEE CURACAO", "TJV BARRA INST WEWORK",
            "TJV BARRA INST WEWOR", "CAFE PERGAMINO", "CAFE QUINDIO CC SANTAFE", "CAFE ZEPPELIN 3",
            "CAFEDIFIRE", "CAFFE ITALIANO LAVAZ", "COLO COFFEE USAQUEN", "FILANDIA COFFEE",
            "STARBUCKS FONTANAR", "STARBUCKS MALLPLAZA NQ", "Starbucks Fontanar",
            "TOSTAO CAFE Y PAN CE", "VARIETALE DORADO", "EL ALTILLO CAFE STA BA",
            "TIENDA LIBERTARIO COFF", "CARULLA CALLE 140", "EXITO FONTANAR CHIA",
            "EXITO WOW COUNTRY", "EXITO WOW UNIBOGOTA", "TH EXITOS SAS", "TH UNICENTRO BOGOTA",
            "EYD CAFES SAS EXITO", "JERONIMO MARTINS COLOM (ARA)", "TIENDA D1 ECOTEK 99",
            "ALKOSTO AVX 68", "GARDEN MARKET SAS", "CABAÑA ALPINA SOPO", "EL FRIJOL IN S A S",
            "ALIMENTOS RIE", "BOLD*AWALA BURGERS", "BOLD*BUENAZO EL POLL", "BOLD*GANSO Y CASTOR",
            "BOLD*LOMA", "BOLD*EL JARDIN DE LU", "BOLD*MIS RAICES", "BOLD*Avena cubana",
            "BOLD*EL MISTICO", "BOLD*ANATOLIA CONCEP", "BOLD*MERCARI", "BOLD*ARISTAS",
            "BOLD*CONCEPTO D", "NOVAVENTA", "COMPRA EN  NOVAVENTA", "NOVAVENTA BOG",
            "COMPRA EN  STARBUCKS", "JV BOGOTAS", "COMPRA EN  JV BOGOTAS", "COMPRA EN  EYD CAFES",
            "COMPRA EN  TH EXITOS",
        ],
    ),
    (
        "Transporte",
        &[
            "UBER *TRIP", "UBER RIDES", "UBER TRIP", "Uber", "Uber Rides", "Uber viaje", "DIDI",
            "DIDI RIDES", "DL*DIDI RIDES CO", "DLO*DIDI", "Didi", "Didi Rides", "EDS CLL 80",
            "EDS CRUZ ROJA FR", "EDS CRUZ ROJA FR (Gasolina)", "EDS Cruz Roja", "EDS NUEVA AVENIDA",
            "EDS PONTEVEDRA FR", "EDS SOSTENIBLES MELGAR", "ESTACION DE SERVICIO T",
            "CENTRAL PARKING", "CITY PARKING", "PARKING INTERNATIONA", "Parking International",
            "PARQUEADERO 92", "Parqueadero 92", "ESTACIONAMIENTO CARU", "Estacionamiento Caru",
            "FONTANAR CCO/PARQUEA", "FONTANAR CCO/PARQUEADE", "FONTANAR CCO/PARQUEADERO",
            "Fontanar CCO Parqueadero", "IPARK COUNTRY", "CC PALATINO", "CC SALITRE PLAZA",
            "TEMBICI", "Tembici", "Tembici (bicicletas)", "PYU TEMBICI", "PYU*TEMBICI",
            "PAYU*TEMBICI", "PayU Tembici", "DOLLAR RAC", "NATIONAL CAR RENTAL", "RENTING COLOMBIA",
            "AVIANCA", "AVIANCA LIFEMILES CUR", "MPOS-AVIANCA", "SUSCRIPCION LIFEMILES",
            "LATAM AIRLINES", "AEROVIÁS DEL CONTINENT", "DESPEGAR COLOMBIA", "MBTA", "MBTA HARVARD",
            "MBTA Harvard", "MBTA WELLINGTON", "FLYPASS", "PAGO ELECTRONICO FLYPASS",
            "BOLD*ALPARKE",
        ],
    ),
    (
        "Servicios",
        &[
            "COMCEL", "COMCEL (Claro)", "COMCEL - Boton Bancolombia",
            "COMUNICACION CELULAR COMCEL S", "COMUNICACION CELULAR SA COMCEL",
            "UNE EPM Telecomunicaciones", "UNE EPM Telecomunicaciones SA",
            "EMPRESA DE TELECOMUNICACIONES", "Portal Internet", "ENEL COLOMBIA SA ESP",
            "EPM SERVICIOS P", "EPM SERVICIOS P - Factura", "EPM SERVICIOS P - Factura pendiente",
            "Factura EPM SERVICIOS P", "Empresa de Acueducto y Alcant",
            "Empresa de Acueducto y Alcantarillado", "CONJ HACIENDA SANTA",
            "CONJ HACIENDA SANTA BA", "TORRE AMADEUS PROPIE", "PATRIMO AUTONMOS EST",
            "PATRIMONIOS AUTONOMOS FIDUCIA",
        ],
    ),
    (
        "Suscripciones",
        &[
            "SPOTIFY", "Spotify", "PRIME VIDEO", "PRIME VIDEO DL", "AMAZON PRIME",
            "AMAZON PRIME PMTS", "GOOGLE PLAY YOUTUBE", "MICROSOFT", "MICROSOFT*DL",
            "DLO*MICROSOFT", "PAYU*MICROSOFT", "Microsfot", "GOOGLE ONE", "DLO*GOOGLE GOOGLE ONE",
            "Google One", "GOOGLE NORDVPN", "WONDERSHARE.COM", "BANAHOSTING", "CLAUDE.AI",
            "CLAUDEAI", "ANTHROPIC",
        ],
    ),
    (
        "Compras",
        &[
            "AMAZON COM", "AMAZON MKTPLACE", "AMAZON.COM", "Amazon", "MERCADO PAGO",
            "MERCADO PAGO LIMITADA", "MERCADOPAGO", "MERCADOPAGO COLOMBIA",
            "MERCADOPAGO COLOMBIA L", "Mercado Pago", "MERCADO PAGO*MERCADOLI", "FALABELLA",
            "FALABELLA TDA POR DEP", "BOSI BAMBINO COLINA", "MERCADO PAGO*BOSI",
            "TIENDAS PUNTO GEF UNIC", "PYU*ADIDAS", "LOVISA SANTAFE MEDEL", "MERCADO PAGO*PANDORA",
            "MERCADO PAGO*CUEROSVEL", "HOMECENTER", "HOMECENTER CEDRITOS", "HOMECENTER MEDELLIN",
            "HOMECENTER VTAS A DIST", "Homecenter", "Homecenter Mallplaza",
            "JV BOGOTA 4 HOMECENTER", "SODIMAC COLOMBIA SA", "IKEA NQS", "GLOBAL DECORATION SAS",
            "LACORPACK", "K Tronix Salitre Plaza", "KTRONIX CHIA", "BEST BUY",
            "ENSAMBLADORA UNIVERS", "DECATHLON FONTANAR", "DECATHLON PLAZA CLAR",
            "Decathlon Atlantis", "SWING PADEL CLUB COL", "PEPE GANGA FONTANAR",
            "MATERILE JUGUETES LIBR", "BOLD*ZARPO COMICS", "BOLD*Hobbies Cali", "MINISO CALLE 100",
            "Miniso Calle 100", "CACHIVACHES STA ANA", "CACHIVACHES USA", "NOVAVENTA BOG",
            "NOVAVENTA BOG CODIGO", "Novaventa BOG", "IN BOND GEMA N 3", "COSETTE FONTANAR",
            "Faber Castell (BOLD)", "COMPRA EN  FONTANAR", "COMPRA EN  FONTANAR C",
            "INVERSIONECREDITO LAS MALLAS", "INVERSIONES LAS MALLAS", "DECATHLON",
            "COMPRA EN  DECATHLON",
        ],
    ),
    (
        "Salud",
        &[
            "CRUZ VERDE BELMIRA", "CRUZ VERDE UNICENTRO", "Cruz Verde Fontanar",
            "MERCADO PAGO*CRUZVERDE", "DROGAS LA REBAJA", "DROGUERIA EL DORADO",
            "DROGUERIA FONTANAR", "DROGUERIA SALITRE P", "DROG PURA MUELLE INTER",
            "FARMATODO ANDINO", "FARMATODO BELLA SUIZ", "FARMATODO BELMIRA", "FARMATODO CLL 100",
            "FARMATODO CLL 127", "FARMATODO EL TESORO", "FARMATODO LOS PARRA", "LOCATEL CEDRITOS",
            "BOLD*CONSULTORII ODO", "COLCAN", "COMPANIA DE MEDICINA P", "DERMA SUPPORT STORE",
            "TIENDA DIETETICA",
        ],
    ),
    (
        "Entretenimiento",
        &[
            "CINE COLOMBIA", "CINE COLOMBIA S.A", "CINE COLOMBIA S.A.", "LUMINA MULTIPLEX",
            "LUMINA ROOFTOP", "TICKET COLOMBIA", "MERCADO PAGO*FTEATRONA", "CORP DE FERIAS Y EXP",
            "FUNDACION PARQUE JAIME", "VINÓS Y VINILOS ROOFTO", "CLUB HOUSE 109", "AIRBNB",
            "AIRALO", "BOOKING COLONIAL", "HOTEL LA FONTANA", "HOTEL LAS COLINAS DORA",
            "COURTYARD BY MARRIOTT",
        ],
    ),
    (
        "Educación",
        &[
            "BIBLIOTECA LA", "UNIANDINOSE", "CCO Y DE NEGOCIOS AN", "CCO Y DE NEGOCIOS ANDI",
            "CCo y de Negocios ANDI", "CENTRO COMERCIAL Y D", "CIUDADELA COMERCIAL",
            "CIUDADELA COMERCIAL UN",
        ],
    ),
    (
        "Belleza",
        &[
            "SUPER NAILS FONTANAR", "ENTRELAZOS AEROPUERTO", "LA BOUTIQUE DE LAS CAR",
            "La Boutique de las Car",
        ],
    ),
    (
        "Mascotas",
        &[
            "COLSUBSIDIO COLONIAL", "COLSUB TIENDA DIVERSIO",
        ],
    ),
    (
        "Finanzas",
        &[
            "BANCO DE CREDITO DE COLOMBIA", "Banco Davivienda S.A.", "Banco Davivienda S.A. Zona P",
            "NU Colombia (tarjeta de crédito)", "NU Colombia Compania de Finan",
            "NU Compania de Financiamiento", "ALIANZA FIDUCIARIA S.A. FIDEI", "FONDO LEGADOS SAS",
            "DIAN - PSE", "PSE", "PSE Banco", "PSE Comercio", "Pago PSE", "TECNIPAGOS S A",
            "PAYMENTS WAY", "FUNDACION CORAZON VE", "CAJA COLOMBIANA DE SUBSIDIO F",
            "IMPTO GOBIERNO 4X1000", "ABONO INTERESES AHORROS", "PAGO DE NOMI MIBANCO SA",
            "CUOTA DE MANEJO",
        ],
    ),
    (
        "Transferencias",
        &[
            "A JAIRO HAMON", "NANCY JADILLE HOLGUI", "Fernandez Fernandez FO",
            "ANGELA MARIA PANIAGUA RUIZ", "Angela Maria Paniagua Ruiz",
            "Luis Antonio Amaya Salinas", "TRANSF A ANGELA MARIA", "TRANSF A",
        ],
    ),
    (
        "Oficina",
        &[
            "COMERCIAL PAPELERA S", "COMERCERPAL",
        ],
    ),
    (
        "Deportes",
        &[
            "CLUB CAMP BELLAVISTA C",
        ],
    ),
];

const FALLBACK_PATTERNS: &[(&str, &[&str])] = &[
    (
        "Alimentación",
        &["restaurante", "cafe", "coffee", "pizza", "burger", "food", "grill", "panaderia", "pastel"],
    ),
    ("Transporte", &["eds ", "parking", "parqueadero", "uber", "didi", "avianca", "airline"]),
    ("Salud", &["farmacia", "drogueria", "cruz verde", "farmatodo", "medic", "drog"]),
    ("Compras", &["homecenter", "falabella", "alkosto", "amazon", "mercadolibre"]),
    ("Servicios", &["epm", "enel", "comcel", "claro", "une", "telecomunica"]),
    ("Suscripciones", &["spotify", "netflix", "prime", "microsoft", "google"]),
    ("Entretenimiento", &["cine", "teatro", "hotel", "airbnb"]),
];

type Folded = Vec<(&'static str, Vec<String>)>;

fn folded(table: &'static [(&'static str, &'static [&'static str])]) -> Folded {
    table
        .iter()
        .map(|(cat, names)| (*cat, names.iter().map(|n| fold(n)).collect()))
        .collect()
}

static DIRECTORY: LazyLock<Folded> = LazyLock::new(|| folded(MERCHANTS));
static PATTERNS: LazyLock<Folded> = LazyLock::new(|| folded(FALLBACK_PATTERNS));

/// Category of a known merchant. A name contained in the detail matches, and
/// so does a detail that is a fragment of a name.
pub fn merchant_category(detail: &str) -> Option<&'static str> {
    let detail = fold(detail);
    if detail.is_empty() {
        return None;
    }
    let fragment = detail.chars().count() >= MIN_FRAGMENT;
    DIRECTORY
        .iter()
        .find(|(_, names)| {
            names
                .iter()
                .any(|n| detail.contains(n.as_str()) || (fragment && n.contains(detail.as_str())))
        })
        .map(|(cat, _)| *cat)
}

/// Last-resort category from broad name patterns.
pub fn pattern_category(detail: &str) -> Option<&'static str> {
    let detail = fold(detail);
    PATTERNS
        .iter()
        .find(|(_, words)| words.iter().any(|w| detail.contains(w.as_str())))
        .map(|(cat, _)| *cat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_merchants() {
        assert_eq!(merchant_category("CARULLA CALLE 140"), Some("Alimentación"));
        assert_eq!(merchant_category("COMERCIAL PAPELERA S"), Some("Oficina"));
        assert_eq!(merchant_category("CLUB CAMP BELLAVISTA C"), Some("Deportes"));
        assert_eq!(merchant_category("IMPTO GOBIERNO 4X1000"), Some("Finanzas"));
        assert_eq!(merchant_category("BOLD*ALPARKE"), Some("Transporte"));
        assert_eq!(merchant_category("Percimón Tesoro"), Some("Alimentación"));
    }

    #[test]
    fn test_detail_as_fragment_of_a_name() {
        assert_eq!(merchant_category("AVIANCA"), Some("Transporte"));
        assert_eq!(merchant_category("Semolina"), Some("Alimentación"));
        assert_eq!(merchant_category("UNICEF"), None);
        // too short to stand for a merchant
        assert_eq!(merchant_category("EDS"), None);
    }

    #[test]
    fn test_unknown_merchant() {
        assert_eq!(merchant_category("ZXQW 123"), None);
        assert_eq!(merchant_category("  "), None);
    }

    #[test]
    fn test_fallback_patterns() {
        assert_eq!(pattern_category("PANADERIA LA 80"), Some("Alimentación"));
        assert_eq!(pattern_category("Droguería Alemana"), Some("Salud"));
        assert_eq!(pattern_category("HOTEL DEL MAR"), Some("Entretenimiento"));
        assert_eq!(pattern_category("ZXQW"), None);
    }
}
