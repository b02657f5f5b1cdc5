/// Etiquetas COCO en el orden de salida de los modelos de objetos.
pub(crate) const COCO: [&str; 80] = [
    "persona", "bicicleta", "coche", "motocicleta", "avión", "autobús", "tren", "camión", "barco",
    "semáforo", "hidrante", "señal de stop", "parquímetro", "banco", "pájaro", "gato", "perro",
    "caballo", "oveja", "vaca", "elefante", "oso", "cebra", "jirafa", "mochila", "paraguas",
    "bolso", "corbata", "maleta", "frisbee", "esquís", "snowboard", "pelota", "cometa",
    "bate de béisbol", "guante de béisbol", "monopatín", "tabla de surf", "raqueta de tenis",
    "botella", "copa de vino", "taza", "tenedor", "cuchillo", "cuchara", "tazón", "plátano",
    "manzana", "sándwich", "naranja", "brócoli", "zanahoria", "perrito caliente", "pizza",
    "donut", "pastel", "silla", "sofá", "planta", "cama", "mesa", "inodoro", "televisor",
    "portátil", "ratón", "mando", "teclado", "móvil", "microondas", "horno", "tostadora",
    "fregadero", "nevera", "libro", "reloj", "jarrón", "tijeras", "peluche", "secador", "cepillo",
];

/// Clases del modelo de residuos.
pub(crate) const TRASH: [&str; 6] = ["cartón", "vidrio", "metal", "papel", "plástico", "basura"];

pub(crate) fn to_vec(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}
