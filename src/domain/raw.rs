/// Salida cruda de inferencia, previa a la normalización. Cada familia de
/// modelo entrega su propia forma; el adaptador de detecciones las reduce a
/// la misma secuencia canónica sin alterar el orden.
#[derive(Debug, Clone)]
pub enum RawOutput {
    /// Filas `[xmin, ymin, xmax, ymax, confianza, clase]` en píxeles de la
    /// imagen original (familia YOLO). `class_names` indexa por id de clase.
    Rows {
        rows: Vec<[f32; 6]>,
        class_names: Vec<String>,
    },
    /// Columnas paralelas, una entrada por consulta del transformer
    /// (familia DETR).
    Table(DetectionTable),
}

#[derive(Debug, Clone, Default)]
pub struct DetectionTable {
    pub xmin: Vec<f32>,
    pub ymin: Vec<f32>,
    pub xmax: Vec<f32>,
    pub ymax: Vec<f32>,
    pub confidence: Vec<f32>,
    pub class_id: Vec<i64>,
    pub class_name: Vec<String>,
}

impl DetectionTable {
    pub fn len(&self) -> usize {
        self.xmin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xmin.is_empty()
    }

    /// Todas las columnas deben tener la misma longitud; una tabla
    /// incoherente es una fila malformada a efectos de adaptación.
    pub fn is_coherent(&self) -> bool {
        let n = self.xmin.len();
        self.ymin.len() == n
            && self.xmax.len() == n
            && self.ymax.len() == n
            && self.confidence.len() == n
            && self.class_id.len() == n
            && self.class_name.len() == n
    }
}
